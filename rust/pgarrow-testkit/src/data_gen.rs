//! Seeded random rows for tests.

use crate::WireWriter;

/// Rows of a two-column `(int8, text)` table, with the values they encode.
pub struct GeneratedRows {
    pub ids: Vec<Option<i64>>,
    pub names: Vec<Option<String>>,
    pub rows: Vec<Vec<u8>>,
}

/// Generates `count` rows of an `(int8, text)` table; roughly one value in
/// `null_every` is null.
pub fn generate_id_name_rows(count: usize, null_every: u32, seed: u64) -> GeneratedRows {
    assert_ne!(null_every, 0);
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut generated = GeneratedRows {
        ids: Vec::with_capacity(count),
        names: Vec::with_capacity(count),
        rows: Vec::with_capacity(count),
    };

    for _ in 0..count {
        let id = (rng.u32(0..null_every) != 0).then(|| rng.i64(..));
        let name = (rng.u32(0..null_every) != 0).then(|| {
            let len = rng.usize(0..24);
            (0..len).map(|_| rng.alphanumeric()).collect::<String>()
        });

        let mut w = WireWriter::new();
        w.row(2);
        match id {
            Some(id) => w.int8_field(id),
            None => w.null(),
        };
        match &name {
            Some(name) => w.text_field(name),
            None => w.null(),
        };

        generated.ids.push(id);
        generated.names.push(name);
        generated.rows.push(w.into_bytes());
    }
    generated
}
