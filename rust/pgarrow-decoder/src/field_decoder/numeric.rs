//! `numeric` decoding into `Decimal128`.
//!
//! The server sends a numeric as a header followed by base-10000 digits:
//!
//! ```text
//! ndigits: i16, weight: i16, sign: u16, dscale: u16, digits: [i16; ndigits]
//! ```
//!
//! The value is `sum(digits[i] * 10000^(weight - i))`. It is rescaled to the column's
//! decimal scale; digits below that scale are truncated toward zero.

use arrow_schema::{DECIMAL128_MAX_PRECISION, DataType};
use byteorder::{BigEndian, ByteOrder};
use pgarrow_common::{Result, error::Error, verify_arg, verify_data};

use crate::{
    cursor::ByteCursor, options::UserOptions, sink::ColumnSink, type_desc::TypeDescriptor,
    value::Value,
};

pub const NUMERIC_POS: u16 = 0x0000;
pub const NUMERIC_NEG: u16 = 0x4000;
pub const NUMERIC_NAN: u16 = 0xC000;
pub const NUMERIC_PINF: u16 = 0xD000;
pub const NUMERIC_NINF: u16 = 0xF000;

const NBASE: i16 = 10_000;
const DEC_DIGITS: i32 = 4;

#[derive(Clone, Debug)]
pub struct NumericDecoder {
    precision: u8,
    scale: i8,
}

impl NumericDecoder {
    pub fn new(precision: u8, scale: i8) -> Result<NumericDecoder> {
        verify_arg!(
            precision,
            precision > 0 && precision <= DECIMAL128_MAX_PRECISION
        );
        verify_arg!(scale, i32::from(scale) <= i32::from(precision));
        Ok(NumericDecoder { precision, scale })
    }

    /// Takes precision and scale from the type modifier, or from the options when the
    /// column was declared without one. Precisions above 38 are clamped to 38.
    pub fn from_descriptor(desc: &TypeDescriptor, options: &UserOptions) -> Result<NumericDecoder> {
        let (precision, scale) = match desc.numeric_modifier() {
            Some((precision, scale)) => {
                let precision = precision.clamp(1, i32::from(DECIMAL128_MAX_PRECISION));
                (precision as u8, scale.clamp(i32::from(i8::MIN), precision) as i8)
            }
            None => (
                options.default_numeric_precision,
                options.default_numeric_scale,
            ),
        };
        NumericDecoder::new(precision, scale)
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn scale(&self) -> i8 {
        self.scale
    }

    pub fn data_type(&self) -> DataType {
        DataType::Decimal128(self.precision, self.scale)
    }

    pub(crate) fn decode_value(
        &self,
        body: &mut ByteCursor,
        sink: &mut dyn ColumnSink,
    ) -> Result<()> {
        let ndigits = body.read_i16()?;
        let weight = body.read_i16()?;
        let sign = body.read_u16()?;
        let _dscale = body.read_u16()?;
        verify_data!(ndigits, ndigits >= 0);
        let digits = body.read_bytes(ndigits as usize * 2)?;

        match sign {
            NUMERIC_POS | NUMERIC_NEG => {}
            NUMERIC_NAN | NUMERIC_PINF | NUMERIC_NINF => return sink.append_null(),
            _ => {
                return Err(Error::invalid_format(
                    "numeric",
                    format!("unknown sign {sign:#06x}"),
                ));
            }
        }

        let mut value = self.accumulate(weight, digits)?;
        if sign == NUMERIC_NEG {
            value = -value;
        }
        sink.append_value(Value::Decimal128(value))
    }

    /// Unsigned value of the digits, scaled by `10^scale` and truncated.
    fn accumulate(&self, weight: i16, digits: &[u8]) -> Result<i128> {
        let overflow = || Error::invalid_format("numeric", "value exceeds Decimal128 range");

        let mut value: i128 = 0;
        for (i, chunk) in digits.chunks_exact(2).enumerate() {
            let digit = BigEndian::read_i16(chunk);
            verify_data!(digit, (0..NBASE).contains(&digit));
            if digit == 0 {
                continue;
            }

            let exp10 = DEC_DIGITS * (i32::from(weight) - i as i32) + i32::from(self.scale);
            if exp10 >= 0 {
                let term = 10i128
                    .checked_pow(exp10 as u32)
                    .and_then(|p| p.checked_mul(i128::from(digit)))
                    .ok_or_else(overflow)?;
                value = value.checked_add(term).ok_or_else(overflow)?;
            } else if exp10 > -DEC_DIGITS {
                value += i128::from(digit) / 10i128.pow(exp10.unsigned_abs());
            } else {
                // Every following digit is further below the scale.
                break;
            }
        }

        if value >= 10i128.pow(u32::from(self.precision)) {
            return Err(Error::invalid_format(
                "numeric",
                format!("value does not fit precision {}", self.precision),
            ));
        }
        Ok(value)
    }
}
