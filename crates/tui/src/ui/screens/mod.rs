pub mod dashboard;
pub mod expense_dialog;
