pub mod migrate;
pub mod report;
pub mod verify;
