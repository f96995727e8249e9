pub(crate) mod charts;
pub(crate) mod hooks;
pub(crate) mod inventory_form;
pub(crate) mod inventory_table;
pub(crate) mod toast_area;
pub(crate) mod ui;

pub(crate) use charts::{BarChart, PieChart};
pub(crate) use inventory_form::InventoryForm;
pub(crate) use inventory_table::InventoryTable;
pub(crate) use toast_area::ToastArea;
