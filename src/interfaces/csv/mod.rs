pub mod commitment_writer;
pub mod operation_reader;
