use super::ICustomerRepo;
use randevu_reminders_domain::{Customer, ID};
use sqlx::{FromRow, PgPool};
use tracing::error;
use uuid::Uuid;

pub struct PostgresCustomerRepo {
    pool: PgPool,
}

impl PostgresCustomerRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CustomerRaw {
    customer_uid: Uuid,
    full_name: String,
    phone_number: String,
    email: Option<String>,
}

impl From<CustomerRaw> for Customer {
    fn from(e: CustomerRaw) -> Self {
        Self {
            id: e.customer_uid.into(),
            full_name: e.full_name,
            phone_number: e.phone_number,
            email: e.email,
        }
    }
}

#[async_trait::async_trait]
impl ICustomerRepo for PostgresCustomerRepo {
    async fn insert(&self, customer: &Customer) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO customers(customer_uid, full_name, phone_number, email)
            VALUES($1, $2, $3, $4)
            "#,
        )
        .bind(customer.id.inner_ref())
        .bind(&customer.full_name)
        .bind(&customer.phone_number)
        .bind(&customer.email)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert customer: {:?}. DB returned error: {:?}",
                customer, e
            );
            e
        })?;
        Ok(())
    }

    async fn save(&self, customer: &Customer) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE customers
            SET full_name = $2,
            phone_number = $3,
            email = $4
            WHERE customer_uid = $1
            "#,
        )
        .bind(customer.id.inner_ref())
        .bind(&customer.full_name)
        .bind(&customer.phone_number)
        .bind(&customer.email)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to save customer: {:?}. DB returned error: {:?}",
                customer, e
            );
            e
        })?;
        Ok(())
    }

    async fn find(&self, customer_id: &ID) -> Option<Customer> {
        let res: Option<CustomerRaw> = sqlx::query_as(
            r#"
            SELECT * FROM customers
            WHERE customer_uid = $1
            "#,
        )
        .bind(customer_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find customer with id: {:?} failed. DB returned error: {:?}",
                customer_id, e
            );
            e
        })
        .ok()?;
        res.map(|customer| customer.into())
    }

    async fn delete(&self, customer_id: &ID) -> Option<Customer> {
        let res: Option<CustomerRaw> = sqlx::query_as(
            r#"
            DELETE FROM customers
            WHERE customer_uid = $1
            RETURNING *
            "#,
        )
        .bind(customer_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Delete customer with id: {:?} failed. DB returned error: {:?}",
                customer_id, e
            );
            e
        })
        .ok()?;
        res.map(|customer| customer.into())
    }
}
