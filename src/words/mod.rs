pub mod csv_table;
pub mod pool;
pub mod sentences;
pub mod source;
