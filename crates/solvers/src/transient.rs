pub mod explicit;
