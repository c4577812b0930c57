mod inventory;
mod medications;
mod prescriptions;

pub use inventory::InventoryScreen;
pub use medications::MedicationListScreen;
pub use prescriptions::PrescriptionListScreen;
