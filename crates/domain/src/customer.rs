use crate::shared::entity::{Entity, ID};

/// Contact information for a salon customer. Owned by the booking flow,
/// read-only in this service.
#[derive(Debug, Clone)]
pub struct Customer {
    pub id: ID,
    pub full_name: String,
    pub phone_number: String,
    pub email: Option<String>,
}

impl Customer {
    pub fn new(full_name: String, phone_number: String, email: Option<String>) -> Self {
        Self {
            id: Default::default(),
            full_name,
            phone_number,
            email,
        }
    }
}

impl Entity for Customer {
    fn id(&self) -> &ID {
        &self.id
    }
}
