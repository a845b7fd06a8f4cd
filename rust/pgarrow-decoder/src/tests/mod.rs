
mod composite_decoding;
mod truncation;
