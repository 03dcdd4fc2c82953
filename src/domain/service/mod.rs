pub mod csv_decoder;
pub mod pacer;
pub mod row_validator;
