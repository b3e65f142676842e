use super::ICustomerRepo;
use crate::repos::shared::inmemory_repo::*;
use randevu_reminders_domain::{Customer, ID};

pub struct InMemoryCustomerRepo {
    customers: std::sync::Mutex<Vec<Customer>>,
}

impl InMemoryCustomerRepo {
    pub fn new() -> Self {
        Self {
            customers: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl ICustomerRepo for InMemoryCustomerRepo {
    async fn insert(&self, customer: &Customer) -> anyhow::Result<()> {
        insert(customer, &self.customers);
        Ok(())
    }

    async fn save(&self, customer: &Customer) -> anyhow::Result<()> {
        save(customer, &self.customers);
        Ok(())
    }

    async fn find(&self, customer_id: &ID) -> Option<Customer> {
        find(customer_id, &self.customers)
    }

    async fn delete(&self, customer_id: &ID) -> Option<Customer> {
        delete(customer_id, &self.customers)
    }
}
