pub mod pharmacy;
