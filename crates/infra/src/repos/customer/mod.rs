mod inmemory;
mod postgres;

pub use inmemory::InMemoryCustomerRepo;
pub use postgres::PostgresCustomerRepo;
use randevu_reminders_domain::{Customer, ID};

#[async_trait::async_trait]
pub trait ICustomerRepo: Send + Sync {
    async fn insert(&self, customer: &Customer) -> anyhow::Result<()>;
    async fn save(&self, customer: &Customer) -> anyhow::Result<()>;
    async fn find(&self, customer_id: &ID) -> Option<Customer>;
    async fn delete(&self, customer_id: &ID) -> Option<Customer>;
}

#[cfg(test)]
mod tests {
    use crate::Repos;
    use randevu_reminders_domain::Customer;

    #[tokio::test]
    async fn crud_roundtrip() {
        let repos = Repos::create_inmemory();

        let mut customer = Customer::new("Fatma Demir".into(), "5559876543".into(), None);
        repos
            .customers
            .insert(&customer)
            .await
            .expect("To insert customer");

        let found = repos.customers.find(&customer.id).await.unwrap();
        assert_eq!(found.full_name, "Fatma Demir");
        assert!(found.email.is_none());

        customer.email = Some("fatma@example.com".into());
        repos
            .customers
            .save(&customer)
            .await
            .expect("To save customer");
        let found = repos.customers.find(&customer.id).await.unwrap();
        assert_eq!(found.email.as_deref(), Some("fatma@example.com"));

        assert!(repos.customers.delete(&customer.id).await.is_some());
        assert!(repos.customers.find(&customer.id).await.is_none());
    }
}
