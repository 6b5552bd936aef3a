use std::ops::Index;

use crate::domain::models::Recipient;

use super::DispatchError;

/// Ordered snapshot of the recipients taken at dispatch start. Duplicates are
/// kept and delivered twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientQueue {
    recipients: Vec<Recipient>,
}

impl RecipientQueue {
    pub fn build(recipients: Vec<Recipient>) -> Result<Self, DispatchError> {
        if recipients.is_empty() {
            return Err(DispatchError::InvalidInput(
                "campaign has no recipients".to_string(),
            ));
        }
        Ok(Self { recipients })
    }

    pub fn len(&self) -> usize {
        self.recipients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipients.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recipient> {
        self.recipients.iter()
    }

    pub fn into_inner(self) -> Vec<Recipient> {
        self.recipients
    }
}

impl Index<usize> for RecipientQueue {
    type Output = Recipient;

    fn index(&self, position: usize) -> &Self::Output {
        &self.recipients[position]
    }
}
