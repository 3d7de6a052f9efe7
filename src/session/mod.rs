pub mod answer;
pub mod quiz;
pub mod result;
pub mod summary;
