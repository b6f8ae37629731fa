use crate::db::{Customer, CustomerId, DbHandle, NewCustomer};
use crate::error::CrmError;

/// Customer records. Performs no validation; callers check required fields.
#[derive(Clone)]
pub struct CustomerStore {
    db: DbHandle,
}

impl CustomerStore {
    pub fn new(db: DbHandle) -> Self {
        Self { db }
    }

    pub async fn add(&self, customer: NewCustomer) -> Result<CustomerId, CrmError> {
        self.db.insert_customer(customer).await
    }

    /// Every customer, in insertion order.
    pub async fn list_all(&self) -> Result<Vec<Customer>, CrmError> {
        self.db.list_customers().await
    }

    /// Customers whose name, email or phone contains `term`, ignoring ASCII case.
    pub async fn search(&self, term: &str) -> Result<Vec<Customer>, CrmError> {
        self.db.search_customers(term).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    async fn store() -> CustomerStore {
        CustomerStore::new(db::spawn("sqlite::memory:").await.expect("spawn db"))
    }

    #[tokio::test]
    async fn add_then_list_includes_customer_once() {
        let customers = store().await;
        let first = customers
            .add(NewCustomer::from_raw("Ada", "ada@example.com", "", ""))
            .await
            .unwrap();
        let second = customers
            .add(NewCustomer::from_raw("Ada", "ada@example.com", "", ""))
            .await
            .unwrap();
        assert_ne!(first, second);

        let all = customers.list_all().await.unwrap();
        assert_eq!(all.iter().filter(|c| c.id == second).count(), 1);
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn store_does_not_validate() {
        let customers = store().await;
        customers.add(NewCustomer::default()).await.unwrap();
        assert_eq!(customers.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn search_results_are_subset_containing_term() {
        let customers = store().await;
        for (name, email, phone) in [
            ("Grace Hopper", "grace@navy.mil", "555-1906"),
            ("Alan Turing", "alan@bletchley.uk", ""),
            ("Hopper Fan", "fan@example.com", "555-0000"),
        ] {
            customers
                .add(NewCustomer::from_raw(name, email, phone, ""))
                .await
                .unwrap();
        }

        let all = customers.list_all().await.unwrap();
        let term = "hopper";
        let hits = customers.search(term).await.unwrap();
        assert_eq!(hits.len(), 2);
        for hit in &hits {
            assert!(all.contains(hit));
            let haystacks = [
                hit.name.to_lowercase(),
                hit.email.to_lowercase(),
                hit.phone.clone().unwrap_or_default().to_lowercase(),
            ];
            assert!(haystacks.iter().any(|h| h.contains(term)));
        }

        assert_eq!(customers.search("").await.unwrap(), all);
        assert!(customers.search("zzz").await.unwrap().is_empty());
    }
}
