use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait, sea_query::Expr,
};

use crate::{entities::movie, models::NewMovie, ranking};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("\"{0}\" is already in your list")]
    DuplicateTitle(String),
    #[error(transparent)]
    Db(#[from] DbErr),
}

#[derive(Clone)]
pub struct MovieStore {
    db: DatabaseConnection,
}

impl MovieStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads every movie ranked by rating and writes back rankings that moved.
    pub async fn list_ranked(&self) -> Result<Vec<movie::Model>, DbErr> {
        let movies = movie::Entity::find().order_by_asc(movie::Column::Id).all(&self.db).await?;
        let stored: HashMap<i32, Option<i32>> = movies.iter().map(|m| (m.id, m.ranking)).collect();

        let ranked = ranking::assign_rankings(movies);
        let stale: Vec<&movie::Model> =
            ranked.iter().filter(|m| stored.get(&m.id) != Some(&m.ranking)).collect();

        if !stale.is_empty() {
            let txn = self.db.begin().await?;
            for m in &stale {
                movie::Entity::update_many()
                    .col_expr(movie::Column::Ranking, Expr::value(m.ranking))
                    .filter(movie::Column::Id.eq(m.id))
                    .exec(&txn)
                    .await?;
            }
            txn.commit().await?;
            tracing::debug!(updated = stale.len(), "rankings rewritten");
        }

        Ok(ranked)
    }

    pub async fn get(&self, id: i32) -> Result<Option<movie::Model>, DbErr> {
        movie::Entity::find_by_id(id).one(&self.db).await
    }

    pub async fn count(&self) -> Result<u64, DbErr> {
        movie::Entity::find().count(&self.db).await
    }

    /// Inserts an unrated movie. A title already in the list is reported as
    /// [`StoreError::DuplicateTitle`] and nothing is written.
    pub async fn insert(&self, new: NewMovie) -> Result<movie::Model, StoreError> {
        let title = new.title.clone();
        let model = movie::ActiveModel {
            id: Default::default(),
            title: Set(new.title),
            year: Set(new.year),
            description: Set(new.description),
            rating: Set(None),
            ranking: Set(None),
            review: Set(None),
            img_url: Set(new.img_url),
        };

        model.insert(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => StoreError::DuplicateTitle(title),
            _ => StoreError::Db(e),
        })
    }

    /// Overwrites rating and review only. Returns `None` when the id is unknown.
    pub async fn update_review(
        &self,
        id: i32,
        rating: f64,
        review: &str,
    ) -> Result<Option<movie::Model>, DbErr> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let mut active: movie::ActiveModel = existing.into();
        active.rating = Set(Some(rating));
        active.review = Set(Some(review.to_string()));
        active.update(&self.db).await.map(Some)
    }

    /// Returns whether a row was removed.
    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let res = movie::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected == 1)
    }
}
