//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Listing in insertion order
//! - Case-sensitive substring search
//! - Insert with store-assigned ids
//! - Atomic delete
//!
//! ## Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How Keyword Search Works                             │
//! │                                                                         │
//! │  Keyword: "Red"                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  instr(name, 'Red') > 0 OR instr(description, 'Red') > 0               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │ 1 | Red Shoe  | Leather, size 42        │ ← MATCH (name)            │
//! │  │ 2 | Blue Hat  | Wool                    │                           │
//! │  │ 3 | Scarf     | Red and white stripes   │ ← MATCH (description)     │
//! │  │ 4 | red cap   | Cotton                  │   (case differs)          │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Results: [1, 3] ordered by id                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `instr` is used instead of `LIKE` because `LIKE` folds ASCII case and
//! treats `%` and `_` in the keyword as wildcards.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use catalog_core::{NewProduct, Product};

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// // Search products
/// let results = repo.search("Red").await?;
///
/// // Get by ID
/// let product = repo.get_by_id(42).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists every stored product in insertion order.
    pub async fn list_all(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price_cents, image_url
            FROM products
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Returns products whose name or description contains `keyword`.
    ///
    /// ## Matching
    /// - Case-sensitive
    /// - Plain substring: `%` and `_` are not wildcards
    /// - The keyword is used verbatim; callers reject blank keywords
    ///
    /// ## Example
    /// ```rust,ignore
    /// // "Red Shoe" matches, "red cap" does not
    /// let products = repo.search("Red").await?;
    /// ```
    pub async fn search(&self, keyword: &str) -> DbResult<Vec<Product>> {
        debug!(keyword = %keyword, "Searching products");

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price_cents, image_url
            FROM products
            WHERE instr(name, ?1) > 0 OR instr(description, ?1) > 0
            ORDER BY id
            "#,
        )
        .bind(keyword)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price_cents, image_url
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a validated product and returns it with its new id.
    ///
    /// Ids come from `AUTOINCREMENT`, so an id freed by a delete is never
    /// handed out again.
    pub async fn insert(&self, product: &NewProduct) -> DbResult<Product> {
        debug!(name = %product.name, "Inserting product");

        let inserted = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, description, price_cents, image_url)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, name, description, price_cents, image_url
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    /// Deletes a product and returns the removed row.
    ///
    /// Lookup and removal are a single statement. When two callers delete
    /// the same id, exactly one gets `Some`.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - The product that was removed
    /// * `Ok(None)` - No product had this id
    pub async fn delete(&self, id: i64) -> DbResult<Option<Product>> {
        debug!(id = %id, "Deleting product");

        let deleted = sqlx::query_as::<_, Product>(
            r#"
            DELETE FROM products
            WHERE id = ?1
            RETURNING id, name, description, price_cents, image_url
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(deleted)
    }

    /// Counts stored products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use catalog_core::Money;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn new_product(name: &str, description: &str, cents: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: description.to_string(),
            price: Money::from_cents(cents),
            image_url: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let repo = db.products();

        let mut pen = new_product("Pen", "Blue ink pen", 150);
        pen.image_url = Some("https://img.example/pen.png".to_string());

        let inserted = repo.insert(&pen).await.unwrap();
        assert!(inserted.id > 0);
        assert_eq!(inserted.name, "Pen");
        assert_eq!(inserted.price, Money::from_cents(150));

        let fetched = repo.get_by_id(inserted.id).await.unwrap().unwrap();
        assert_eq!(fetched, inserted);
        assert_eq!(fetched.image_url.as_deref(), Some("https://img.example/pen.png"));
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let db = test_db().await;
        assert!(db.products().get_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_all_in_insertion_order() {
        let db = test_db().await;
        let repo = db.products();

        assert!(repo.list_all().await.unwrap().is_empty());

        repo.insert(&new_product("Zebra Mug", "Mug", 900)).await.unwrap();
        repo.insert(&new_product("Apple Peeler", "Peeler", 450)).await.unwrap();

        let names: Vec<String> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Zebra Mug", "Apple Peeler"]);
    }

    #[tokio::test]
    async fn test_search_is_case_sensitive_substring() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&new_product("Red Shoe", "Leather, size 42", 4999)).await.unwrap();
        repo.insert(&new_product("Blue Hat", "Wool", 1999)).await.unwrap();
        repo.insert(&new_product("Scarf", "Red and white stripes", 1500)).await.unwrap();
        repo.insert(&new_product("red cap", "Cotton", 999)).await.unwrap();

        let names: Vec<String> = repo
            .search("Red")
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Red Shoe", "Scarf"]);

        assert!(repo.search("Green").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_agrees_with_matches_keyword() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&new_product("Red Shoe", "Leather, size 42", 4999)).await.unwrap();
        repo.insert(&new_product("Blue Hat", "Wool, red band", 1999)).await.unwrap();
        repo.insert(&new_product("Café Mug", "Ceramic", 1200)).await.unwrap();
        repo.insert(&new_product("Sale", "100% cotton_blend", 800)).await.unwrap();

        let all = repo.list_all().await.unwrap();
        for keyword in ["Red", "red", "e", "é", "size 4", "%", "_", " ", "Nothing"] {
            let expected: Vec<Product> = all
                .iter()
                .filter(|p| p.matches_keyword(keyword))
                .cloned()
                .collect();
            assert_eq!(repo.search(keyword).await.unwrap(), expected, "{:?}", keyword);
        }
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&new_product("Discount", "Now 50% off", 500)).await.unwrap();
        repo.insert(&new_product("Plain", "No offer", 500)).await.unwrap();

        assert_eq!(repo.search("%").await.unwrap().len(), 1);
        assert!(repo.search("_x_").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_returns_removed_product_once() {
        let db = test_db().await;
        let repo = db.products();

        let pen = repo.insert(&new_product("Pen", "Blue ink pen", 150)).await.unwrap();

        let removed = repo.delete(pen.id).await.unwrap();
        assert_eq!(removed, Some(pen.clone()));

        assert!(repo.delete(pen.id).await.unwrap().is_none());
        assert!(repo.get_by_id(pen.id).await.unwrap().is_none());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_deletes_single_winner() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.db");
        let db = Database::new(DbConfig::new(path.display().to_string()).max_connections(4))
            .await
            .unwrap();

        let id = db
            .products()
            .insert(&new_product("Pen", "Blue ink pen", 150))
            .await
            .unwrap()
            .id;

        let deletes: Vec<_> = (0..8)
            .map(|_| {
                let repo = db.products();
                tokio::spawn(async move { repo.delete(id).await })
            })
            .collect();

        let mut winners = 0;
        for handle in deletes {
            if handle.await.unwrap().unwrap().is_some() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
        assert_eq!(db.products().count().await.unwrap(), 0);

        db.close().await;
    }

    #[tokio::test]
    async fn test_ids_are_not_reused() {
        let db = test_db().await;
        let repo = db.products();

        let first = repo.insert(&new_product("One", "First", 100)).await.unwrap();
        repo.delete(first.id).await.unwrap();

        let second = repo.insert(&new_product("Two", "Second", 100)).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_text_with_nul_is_stored_whole() {
        let db = test_db().await;
        let repo = db.products();

        let mut product = new_product("\0Pen", "Blue\0ink", 150);
        product.image_url = Some("\0".to_string());

        let inserted = repo.insert(&product).await.unwrap();
        let fetched = repo.get_by_id(inserted.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "\0Pen");
        assert_eq!(fetched.description, "Blue\0ink");
        assert_eq!(fetched.image_url.as_deref(), Some("\0"));
    }

    #[tokio::test]
    async fn test_check_constraint_rejects_empty_name() {
        let db = test_db().await;

        let err = db
            .products()
            .insert(&new_product("", "No name", 150))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::QueryFailed(_)));
    }

    #[tokio::test]
    async fn test_check_constraint_rejects_bad_price() {
        let db = test_db().await;

        let err = db
            .products()
            .insert(&new_product("Cheap", "Too cheap", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::QueryFailed(_)));
    }
}
