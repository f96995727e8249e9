mod add_item;
mod dashboard;
mod inventory;
mod landing;
mod layout;
mod login;
mod reports;
mod settings;
mod signup;

pub use add_item::AddItemPage;
pub use dashboard::DashboardPage;
pub use inventory::InventoryPage;
pub use landing::LandingPage;
pub use layout::RootAuthed;
pub use login::LoginPage;
pub use reports::ReportsPage;
pub use settings::SettingsPage;
pub use signup::SignupPage;
