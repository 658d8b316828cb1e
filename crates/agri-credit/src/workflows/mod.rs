pub mod credit;
pub mod yield_data;
