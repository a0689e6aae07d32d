pub mod company;
pub mod progress;
pub mod roadmap;
