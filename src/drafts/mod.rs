mod item;

pub(crate) use item::{
    EditSession, FormField, Reconcile, Submission, REMOTE_DELETED_MESSAGE,
};
