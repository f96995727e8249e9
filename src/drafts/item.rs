use crate::models::{InventoryItem, ItemDraft};
use crate::view_model::format_date_iso;
use chrono::NaiveDate;

pub(crate) const REMOTE_DELETED_MESSAGE: &str = "This item was deleted elsewhere";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FormField {
    Name,
    Category,
    Quantity,
    ExpiryDate,
}

/// Raw input values, exactly as typed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ItemForm {
    pub name: String,
    pub category: String,
    pub quantity: String,
    pub expiry_date: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct FormErrors {
    pub name: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<String>,
    pub expiry_date: Option<String>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.quantity.is_none()
            && self.expiry_date.is_none()
    }

    pub fn get(&self, field: FormField) -> Option<String> {
        match field {
            FormField::Name => self.name.clone(),
            FormField::Category => self.category.clone(),
            FormField::Quantity => self.quantity.clone(),
            FormField::ExpiryDate => self.expiry_date.clone(),
        }
    }
}

impl ItemForm {
    pub fn from_draft(draft: &ItemDraft) -> Self {
        Self {
            name: draft.name.clone(),
            category: draft.category.clone(),
            quantity: draft.quantity.to_string(),
            expiry_date: format_date_iso(draft.expiry_date),
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Category => &self.category,
            FormField::Quantity => &self.quantity,
            FormField::ExpiryDate => &self.expiry_date,
        }
    }

    fn slot(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.name,
            FormField::Category => &mut self.category,
            FormField::Quantity => &mut self.quantity,
            FormField::ExpiryDate => &mut self.expiry_date,
        }
    }

    pub fn validate(&self) -> Result<ItemDraft, FormErrors> {
        let mut errors = FormErrors::default();

        let name = self.name.trim();
        if name.is_empty() {
            errors.name = Some("Name is required.".to_string());
        }

        let category = self.category.trim();
        if category.is_empty() {
            errors.category = Some("Category is required.".to_string());
        }

        let quantity = match self.quantity.trim().parse::<i64>() {
            Ok(q) if q >= 0 => Some(q),
            _ => {
                errors.quantity = Some("Quantity must be a whole number of 0 or more.".to_string());
                None
            }
        };

        let raw_date = self.expiry_date.trim();
        let expiry_date = if raw_date.is_empty() {
            errors.expiry_date = Some("Expiry date is required.".to_string());
            None
        } else {
            match NaiveDate::parse_from_str(raw_date, "%Y-%m-%d") {
                Ok(d) => Some(d),
                Err(_) => {
                    errors.expiry_date = Some("Expiry date must be a valid date.".to_string());
                    None
                }
            }
        };

        match (quantity, expiry_date) {
            (Some(quantity), Some(expiry_date)) if errors.is_empty() => Ok(ItemDraft {
                name: name.to_string(),
                category: category.to_string(),
                quantity,
                expiry_date: Some(expiry_date),
            }),
            _ => Err(errors),
        }
    }
}

/// What a successful submit asks the sync layer to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Submission {
    Create(ItemDraft),
    Update { id: String, draft: ItemDraft },
}

/// Result of comparing the open form against the latest visible items.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Reconcile {
    Unchanged,
    /// Untouched form picked up the remote values.
    Refreshed,
    /// Remote values changed under local edits; the edits are kept.
    Conflict,
    /// The edited item is gone; the session is back in add mode.
    RemoteDeleted,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct EditTarget {
    id: String,
    /// Latest remote version the form is based on.
    baseline: ItemDraft,
}

/// Add/edit form state kept consistent with the live collection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct EditSession {
    target: Option<EditTarget>,
    form: ItemForm,
    errors: FormErrors,
    conflict: bool,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &ItemForm {
        &self.form
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.target.as_ref().map(|t| t.id.as_str())
    }

    pub fn is_editing(&self) -> bool {
        self.target.is_some()
    }

    pub fn has_conflict(&self) -> bool {
        self.conflict
    }

    /// Edited away from the version the form was loaded from.
    pub fn is_dirty(&self) -> bool {
        match &self.target {
            Some(t) => self.form != ItemForm::from_draft(&t.baseline),
            None => self.form != ItemForm::default(),
        }
    }

    pub fn begin_edit(&mut self, item: &InventoryItem) {
        let baseline = item.draft();
        self.form = ItemForm::from_draft(&baseline);
        self.target = Some(EditTarget {
            id: item.id.clone(),
            baseline,
        });
        self.errors = FormErrors::default();
        self.conflict = false;
    }

    pub fn cancel(&mut self) {
        *self = Self::default();
    }

    pub fn set_field(&mut self, field: FormField, value: String) {
        *self.form.slot(field) = value;
        match field {
            FormField::Name => self.errors.name = None,
            FormField::Category => self.errors.category = None,
            FormField::Quantity => self.errors.quantity = None,
            FormField::ExpiryDate => self.errors.expiry_date = None,
        }
    }

    /// Validates and, on success, resets to an empty add form.
    pub fn submit(&mut self) -> Result<Submission, FormErrors> {
        match self.form.validate() {
            Ok(draft) => {
                let submission = match self.target.take() {
                    Some(t) => Submission::Update { id: t.id, draft },
                    None => Submission::Create(draft),
                };
                self.cancel();
                Ok(submission)
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(errors)
            }
        }
    }

    pub fn reconcile(&mut self, items: &[InventoryItem]) -> Reconcile {
        let Some(target) = self.target.as_mut() else {
            return Reconcile::Unchanged;
        };

        let Some(remote) = items.iter().find(|i| i.id == target.id) else {
            self.cancel();
            return Reconcile::RemoteDeleted;
        };

        let remote = remote.draft();
        if remote == target.baseline {
            return Reconcile::Unchanged;
        }

        let remote_form = ItemForm::from_draft(&remote);
        let dirty = self.form != ItemForm::from_draft(&target.baseline);
        target.baseline = remote;
        if self.form == remote_form {
            // Someone else saved exactly what the user typed.
            self.conflict = false;
            Reconcile::Refreshed
        } else if dirty {
            self.conflict = true;
            Reconcile::Conflict
        } else {
            self.form = ItemForm::from_draft(&target.baseline);
            Reconcile::Refreshed
        }
    }

    /// Drops local edits in favour of the latest remote values.
    pub fn reload_remote(&mut self) -> bool {
        let Some(target) = &self.target else {
            return false;
        };
        self.form = ItemForm::from_draft(&target.baseline);
        self.errors = FormErrors::default();
        self.conflict = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, name: &str, qty: i64) -> InventoryItem {
        InventoryItem {
            id: id.to_string(),
            name: name.to_string(),
            category: "Dairy".to_string(),
            quantity: qty,
            expiry_date: NaiveDate::from_ymd_opt(2026, 3, 1),
            created_at: None,
            updated_at: None,
        }
    }

    fn filled() -> ItemForm {
        ItemForm {
            name: "  Milk ".to_string(),
            category: "Dairy".to_string(),
            quantity: "12".to_string(),
            expiry_date: "2026-03-01".to_string(),
        }
    }

    #[test]
    fn test_validate_trims_and_parses() {
        let draft = filled().validate().unwrap();
        assert_eq!(draft.name, "Milk");
        assert_eq!(draft.quantity, 12);
        assert_eq!(draft.expiry_date, NaiveDate::from_ymd_opt(2026, 3, 1));
    }

    #[test]
    fn test_validate_reports_every_field() {
        let errors = ItemForm {
            name: "   ".to_string(),
            category: String::new(),
            quantity: "-1".to_string(),
            expiry_date: String::new(),
        }
        .validate()
        .unwrap_err();
        assert!(errors.name.is_some());
        assert!(errors.category.is_some());
        assert!(errors.quantity.is_some());
        assert_eq!(errors.expiry_date.as_deref(), Some("Expiry date is required."));
    }

    #[test]
    fn test_validate_rejects_bad_quantity_and_date() {
        let mut form = filled();
        form.quantity = "2.5".to_string();
        form.expiry_date = "2026-02-30".to_string();
        let errors = form.validate().unwrap_err();
        assert!(errors.quantity.is_some());
        assert_eq!(
            errors.expiry_date.as_deref(),
            Some("Expiry date must be a valid date.")
        );
        assert!(errors.name.is_none());

        form.quantity = "0".to_string();
        form.expiry_date = "2026-02-28".to_string();
        assert_eq!(form.validate().unwrap().quantity, 0);
    }

    #[test]
    fn test_submit_create_resets_form() {
        let mut s = EditSession::new();
        s.set_field(FormField::Name, "Milk".to_string());
        s.set_field(FormField::Category, "Dairy".to_string());
        s.set_field(FormField::Quantity, "3".to_string());
        s.set_field(FormField::ExpiryDate, "2026-03-01".to_string());
        assert!(s.is_dirty());

        let sub = s.submit().unwrap();
        assert!(matches!(sub, Submission::Create(ref d) if d.quantity == 3));
        assert_eq!(s, EditSession::new());
    }

    #[test]
    fn test_submit_invalid_keeps_values_and_errors() {
        let mut s = EditSession::new();
        s.set_field(FormField::Name, "Milk".to_string());
        assert!(s.submit().is_err());
        assert_eq!(s.form().name, "Milk");
        assert!(s.errors().quantity.is_some());

        s.set_field(FormField::Quantity, "4".to_string());
        assert!(s.errors().quantity.is_none());
    }

    #[test]
    fn test_submit_update_targets_edited_item() {
        let mut s = EditSession::new();
        s.begin_edit(&item("a", "Milk", 3));
        assert_eq!(s.form().quantity, "3");
        s.set_field(FormField::Quantity, "8".to_string());

        let sub = s.submit().unwrap();
        match sub {
            Submission::Update { id, draft } => {
                assert_eq!(id, "a");
                assert_eq!(draft.quantity, 8);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(!s.is_editing());
    }

    #[test]
    fn test_reconcile_clean_form_refreshes() {
        let mut s = EditSession::new();
        s.begin_edit(&item("a", "Milk", 3));
        assert_eq!(s.reconcile(&[item("a", "Milk", 3)]), Reconcile::Unchanged);

        assert_eq!(s.reconcile(&[item("a", "Milk", 9)]), Reconcile::Refreshed);
        assert_eq!(s.form().quantity, "9");
        assert!(!s.has_conflict());
    }

    #[test]
    fn test_reconcile_dirty_form_reports_conflict() {
        let mut s = EditSession::new();
        s.begin_edit(&item("a", "Milk", 3));
        s.set_field(FormField::Name, "Whole milk".to_string());

        assert_eq!(s.reconcile(&[item("a", "Milk", 9)]), Reconcile::Conflict);
        assert_eq!(s.form().name, "Whole milk");
        assert_eq!(s.form().quantity, "3");
        assert!(s.has_conflict());

        // Same remote again: nothing new to report, conflict stays flagged.
        assert_eq!(s.reconcile(&[item("a", "Milk", 9)]), Reconcile::Unchanged);
        assert!(s.has_conflict());

        assert!(s.reload_remote());
        assert_eq!(s.form().name, "Milk");
        assert_eq!(s.form().quantity, "9");
        assert!(!s.has_conflict());
        assert!(!s.is_dirty());
    }

    #[test]
    fn test_reconcile_matching_remote_edit_is_not_a_conflict() {
        let mut s = EditSession::new();
        s.begin_edit(&item("a", "Milk", 3));
        s.set_field(FormField::Quantity, "9".to_string());

        assert_eq!(s.reconcile(&[item("a", "Milk", 9)]), Reconcile::Refreshed);
        assert!(!s.has_conflict());
        assert!(!s.is_dirty());
        assert_eq!(s.form().quantity, "9");

        // A flagged conflict clears once the remote catches up with the form.
        s.set_field(FormField::Name, "Whole milk".to_string());
        assert_eq!(s.reconcile(&[item("a", "Milk", 4)]), Reconcile::Conflict);
        s.set_field(FormField::Quantity, "4".to_string());
        s.set_field(FormField::Name, "Skim".to_string());
        assert_eq!(s.reconcile(&[item("a", "Skim", 4)]), Reconcile::Refreshed);
        assert!(!s.has_conflict());
    }

    #[test]
    fn test_reconcile_remote_delete_resets() {
        let mut s = EditSession::new();
        s.begin_edit(&item("a", "Milk", 3));
        s.set_field(FormField::Quantity, "5".to_string());

        assert_eq!(s.reconcile(&[item("b", "Eggs", 1)]), Reconcile::RemoteDeleted);
        assert!(!s.is_editing());
        assert_eq!(s.form(), &ItemForm::default());
    }

    #[test]
    fn test_reconcile_in_add_mode_is_noop() {
        let mut s = EditSession::new();
        s.set_field(FormField::Name, "Milk".to_string());
        assert_eq!(s.reconcile(&[]), Reconcile::Unchanged);
        assert_eq!(s.form().name, "Milk");
        assert!(!s.reload_remote());
    }
}
