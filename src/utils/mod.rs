pub mod bet_slip;
pub mod data;
pub mod filters;
pub mod offers;
