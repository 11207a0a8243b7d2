//! [`MemoryStore`]: in-process [`RecordStore`] backed by hash maps.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;
use vault::LookupKey;

use super::{
    FavoriteRecord, PortfolioRecord, ProfilePatch, RecordStore, StoreError, TradeRecord,
    UserRecord,
};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<LookupKey, UserRecord>,
    portfolios: HashMap<String, PortfolioRecord>,
    trades: Vec<TradeRecord>,
    favorites: Vec<FavoriteRecord>,
}

/// Thread-safe in-memory record store.
///
/// Wraps an `Arc<RwLock<_>>` so reads run concurrently and every write,
/// including its uniqueness check, happens under a single write lock.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Create a new, empty [`MemoryStore`].
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn user_count(&self) -> usize {
        self.inner.read().await.users.len()
    }
}

/// Newest first; ties keep reverse insertion order.
fn newest_first<T, K: Ord>(
    rows: impl DoubleEndedIterator<Item = T>,
    ts: impl Fn(&T) -> K,
) -> Vec<T> {
    let mut out: Vec<T> = rows.rev().collect();
    out.sort_by(|a, b| ts(b).cmp(&ts(a)));
    out
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn find_user(&self, key: &LookupKey) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.inner.read().await.users.get(key).cloned())
    }

    async fn insert_user(&self, user: UserRecord) -> Result<UserRecord, StoreError> {
        let mut tables = self.inner.write().await;
        if tables.users.contains_key(&user.lookup_key) {
            return Err(StoreError::Conflict("user".into()));
        }
        tables.users.insert(user.lookup_key.clone(), user.clone());
        Ok(user)
    }

    async fn update_user(
        &self,
        key: &LookupKey,
        patch: ProfilePatch,
    ) -> Result<UserRecord, StoreError> {
        let mut tables = self.inner.write().await;
        let user = tables
            .users
            .get_mut(key)
            .ok_or_else(|| StoreError::NotFound("user".into()))?;
        if let Some(username) = patch.username {
            user.username = username;
        }
        if let Some(about) = patch.about {
            user.about = about;
        }
        Ok(user.clone())
    }

    async fn insert_portfolio(
        &self,
        portfolio: PortfolioRecord,
    ) -> Result<PortfolioRecord, StoreError> {
        let mut tables = self.inner.write().await;
        if tables.portfolios.contains_key(&portfolio.id) {
            return Err(StoreError::Conflict(format!("portfolio {}", portfolio.id)));
        }
        tables
            .portfolios
            .insert(portfolio.id.clone(), portfolio.clone());
        Ok(portfolio)
    }

    async fn get_portfolio(&self, id: &str) -> Result<Option<PortfolioRecord>, StoreError> {
        Ok(self.inner.read().await.portfolios.get(id).cloned())
    }

    async fn list_portfolios(&self) -> Result<Vec<PortfolioRecord>, StoreError> {
        let tables = self.inner.read().await;
        let mut rows: Vec<PortfolioRecord> = tables.portfolios.values().cloned().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn portfolios_by_creator(
        &self,
        key: &LookupKey,
    ) -> Result<Vec<PortfolioRecord>, StoreError> {
        let tables = self.inner.read().await;
        let mut rows: Vec<PortfolioRecord> = tables
            .portfolios
            .values()
            .filter(|p| &p.creator_key == key)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn delete_portfolio(&self, id: &str) -> Result<PortfolioRecord, StoreError> {
        self.inner
            .write()
            .await
            .portfolios
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(format!("portfolio {id}")))
    }

    async fn insert_trade(&self, trade: TradeRecord) -> Result<TradeRecord, StoreError> {
        let mut tables = self.inner.write().await;
        if !tables.portfolios.contains_key(&trade.portfolio_id) {
            return Err(StoreError::NotFound(format!("portfolio {}", trade.portfolio_id)));
        }
        tables.trades.push(trade.clone());
        Ok(trade)
    }

    async fn trades_by_buyer(&self, key: &LookupKey) -> Result<Vec<TradeRecord>, StoreError> {
        let tables = self.inner.read().await;
        let rows = tables.trades.iter().filter(|t| &t.buyer_key == key).cloned();
        Ok(newest_first(rows, |t| t.timestamp))
    }

    async fn insert_favorite(
        &self,
        favorite: FavoriteRecord,
    ) -> Result<FavoriteRecord, StoreError> {
        let mut tables = self.inner.write().await;
        let duplicate = tables
            .favorites
            .iter()
            .any(|f| f.user_key == favorite.user_key && f.portfolio_id == favorite.portfolio_id);
        if duplicate {
            return Err(StoreError::Conflict(format!(
                "favorite for {}",
                favorite.portfolio_id
            )));
        }
        tables.favorites.push(favorite.clone());
        Ok(favorite)
    }

    async fn delete_favorite(
        &self,
        key: &LookupKey,
        portfolio_id: &str,
    ) -> Result<FavoriteRecord, StoreError> {
        let mut tables = self.inner.write().await;
        let pos = tables
            .favorites
            .iter()
            .position(|f| &f.user_key == key && f.portfolio_id == portfolio_id)
            .ok_or_else(|| StoreError::NotFound(format!("favorite for {portfolio_id}")))?;
        Ok(tables.favorites.remove(pos))
    }

    async fn favorites_by_user(
        &self,
        key: &LookupKey,
    ) -> Result<Vec<FavoriteRecord>, StoreError> {
        let tables = self.inner.read().await;
        let rows = tables.favorites.iter().filter(|f| &f.user_key == key).cloned();
        Ok(newest_first(rows, |f| f.created_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use vault::{lookup_key, SealedAddress};

    fn user(address: &str) -> UserRecord {
        UserRecord {
            lookup_key: lookup_key(address),
            sealed_address: SealedAddress::new("c2VhbGVk"),
            username: "NewUser".into(),
            about: String::new(),
            created_at: Utc::now(),
        }
    }

    fn portfolio(id: &str, creator: &str, age_secs: i64) -> PortfolioRecord {
        PortfolioRecord {
            id: id.into(),
            creator_key: lookup_key(creator),
            tokens: vec!["SOL".into(), "USDC".into()],
            created_at: Utc::now() - Duration::seconds(age_secs),
        }
    }

    #[tokio::test]
    async fn initially_empty() {
        let store = MemoryStore::new();
        assert_eq!(store.user_count().await, 0);
        assert!(store.find_user(&lookup_key("a")).await.unwrap().is_none());
        assert!(store.list_portfolios().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn insert_and_find_user() {
        let store = MemoryStore::new();
        store.insert_user(user("alice")).await.unwrap();
        let found = store.find_user(&lookup_key("alice")).await.unwrap();
        assert_eq!(found.unwrap().username, "NewUser");
    }

    #[tokio::test]
    async fn duplicate_user_conflicts() {
        let store = MemoryStore::new();
        store.insert_user(user("alice")).await.unwrap();
        let err = store.insert_user(user("alice")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn update_user_applies_only_given_columns() {
        let store = MemoryStore::new();
        store.insert_user(user("alice")).await.unwrap();
        let patch = ProfilePatch {
            username: None,
            about: Some("hodler".into()),
        };
        let updated = store.update_user(&lookup_key("alice"), patch).await.unwrap();
        assert_eq!(updated.username, "NewUser");
        assert_eq!(updated.about, "hodler");
    }

    #[tokio::test]
    async fn update_missing_user_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .update_user(&lookup_key("ghost"), ProfilePatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn portfolios_listed_newest_first() {
        let store = MemoryStore::new();
        store.insert_portfolio(portfolio("old", "alice", 60)).await.unwrap();
        store.insert_portfolio(portfolio("new", "bob", 1)).await.unwrap();
        let ids: Vec<String> = store
            .list_portfolios()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["new", "old"]);
    }

    #[tokio::test]
    async fn portfolios_filtered_by_creator() {
        let store = MemoryStore::new();
        store.insert_portfolio(portfolio("a1", "alice", 5)).await.unwrap();
        store.insert_portfolio(portfolio("b1", "bob", 5)).await.unwrap();
        let rows = store.portfolios_by_creator(&lookup_key("alice")).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "a1");
    }

    #[tokio::test]
    async fn delete_portfolio_removes_row() {
        let store = MemoryStore::new();
        store.insert_portfolio(portfolio("p", "alice", 0)).await.unwrap();
        store.delete_portfolio("p").await.unwrap();
        assert!(store.get_portfolio("p").await.unwrap().is_none());
        assert!(matches!(
            store.delete_portfolio("p").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn trade_requires_existing_portfolio() {
        let store = MemoryStore::new();
        let trade = TradeRecord {
            id: "t1".into(),
            buyer_key: lookup_key("alice"),
            portfolio_id: "missing".into(),
            amount: 1.0,
            timestamp: Utc::now(),
        };
        assert!(matches!(
            store.insert_trade(trade).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn trades_newest_first_per_buyer() {
        let store = MemoryStore::new();
        store.insert_portfolio(portfolio("p", "bob", 0)).await.unwrap();
        let now = Utc::now();
        for (id, buyer, age) in [("t1", "alice", 30), ("t2", "alice", 10), ("t3", "carol", 0)] {
            store
                .insert_trade(TradeRecord {
                    id: id.into(),
                    buyer_key: lookup_key(buyer),
                    portfolio_id: "p".into(),
                    amount: 1.0,
                    timestamp: now - Duration::seconds(age),
                })
                .await
                .unwrap();
        }
        let ids: Vec<String> = store
            .trades_by_buyer(&lookup_key("alice"))
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec!["t2", "t1"]);
    }

    #[tokio::test]
    async fn favorites_unique_per_user_and_portfolio() {
        let store = MemoryStore::new();
        let fav = FavoriteRecord {
            user_key: lookup_key("alice"),
            portfolio_id: "p".into(),
            created_at: Utc::now(),
        };
        store.insert_favorite(fav.clone()).await.unwrap();
        assert!(matches!(
            store.insert_favorite(fav.clone()).await,
            Err(StoreError::Conflict(_))
        ));

        let other_user = FavoriteRecord {
            user_key: lookup_key("bob"),
            ..fav
        };
        store.insert_favorite(other_user).await.unwrap();
    }

    #[tokio::test]
    async fn delete_favorite_only_matches_owner() {
        let store = MemoryStore::new();
        store
            .insert_favorite(FavoriteRecord {
                user_key: lookup_key("alice"),
                portfolio_id: "p".into(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();
        assert!(store.delete_favorite(&lookup_key("bob"), "p").await.is_err());
        store.delete_favorite(&lookup_key("alice"), "p").await.unwrap();
        assert!(store
            .favorites_by_user(&lookup_key("alice"))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn favorites_newest_first() {
        let store = MemoryStore::new();
        let now = Utc::now();
        for (pid, age) in [("p1", 20), ("p2", 0), ("p3", 10)] {
            store
                .insert_favorite(FavoriteRecord {
                    user_key: lookup_key("alice"),
                    portfolio_id: pid.into(),
                    created_at: now - Duration::seconds(age),
                })
                .await
                .unwrap();
        }
        let ids: Vec<String> = store
            .favorites_by_user(&lookup_key("alice"))
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.portfolio_id)
            .collect();
        assert_eq!(ids, vec!["p2", "p3", "p1"]);
    }

    #[tokio::test]
    async fn concurrent_inserts_create_one_user() {
        let store = MemoryStore::new();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.insert_user(user("alice")).await.is_ok() })
            })
            .collect();
        let mut created = 0;
        for h in handles {
            if h.await.unwrap() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
        assert_eq!(store.user_count().await, 1);
    }
}
