//! Read-only favorite listings.
//!
//! Listings go to a read replica by default. Use [`FavoriteQuery::consistent`]
//! when the caller must see its own preceding write.

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use super::group_repository::FavoriteGroupRepository;
use super::repository::FavoriteRepository;
use super::types::{FavoriteGroup, GroupOrder, HoleOrder};
use crate::db::{Access, Database};
use crate::hole::{Hole, HOLE_COLUMNS};
use crate::Result;

/// Query facade over favorites and favorite groups.
pub struct FavoriteQuery<'a> {
    db: &'a Database,
    access: Access,
}

impl<'a> FavoriteQuery<'a> {
    /// Create a query facade reading from replicas.
    pub fn new(db: &'a Database) -> Self {
        Self {
            db,
            access: Access::Read,
        }
    }

    /// Read from the write primary instead of a replica.
    pub fn consistent(mut self) -> Self {
        self.access = Access::ReadAfterWrite;
        self
    }

    /// Favorited hole ids, in position order.
    ///
    /// With no group, all favorites are listed by group id and then position.
    pub async fn hole_ids(&self, user_id: i64, group_id: Option<i64>) -> Result<Vec<i64>> {
        let mut conn = self.db.pool(self.access).acquire().await?;
        FavoriteRepository::hole_ids(&mut conn, user_id, group_id).await
    }

    /// Favorited holes joined with their membership rows.
    ///
    /// `None` leaves the order to the database.
    pub async fn holes(
        &self,
        user_id: i64,
        group_id: Option<i64>,
        order: Option<HoleOrder>,
    ) -> Result<Vec<Hole>> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {HOLE_COLUMNS} FROM holes h
             JOIN user_favorites f ON f.hole_id = h.id AND f.user_id = "
        ));
        query.push_bind(user_id);
        if let Some(group_id) = group_id {
            query.push(" AND f.favorite_group_id = ");
            query.push_bind(group_id);
        }
        if let Some(order) = order {
            query.push(" ORDER BY ");
            query.push(order.order_by());
        }

        let mut conn = self.db.pool(self.access).acquire().await?;
        let holes = query
            .build_query_as::<Hole>()
            .fetch_all(&mut *conn)
            .await?;
        Ok(holes)
    }

    /// Active favorite groups of a user.
    pub async fn groups(&self, user_id: i64, order: GroupOrder) -> Result<Vec<FavoriteGroup>> {
        let mut conn = self.db.pool(self.access).acquire().await?;
        FavoriteGroupRepository::list(&mut conn, user_id, order).await
    }

    /// Every favorited hole id of a user, read on the given connection.
    ///
    /// Mutations call this inside their transaction to build the response.
    pub async fn snapshot(conn: &mut SqliteConnection, user_id: i64) -> Result<Vec<i64>> {
        FavoriteRepository::hole_ids(conn, user_id, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favorite::testing::{
        create_holes, set_favorite_created_at, set_hole_updated_at, setup_db,
    };
    use crate::favorite::{FavoriteLimits, FavoriteService, DEFAULT_GROUP_ID};

    const USER: i64 = 3;

    #[tokio::test]
    async fn test_hole_ids_plain() {
        let db = setup_db().await;
        let holes = create_holes(&db, 3).await;
        let service = FavoriteService::new(&db, FavoriteLimits::default());
        let (group, _) = service.add_group(USER, "g").await.unwrap();
        let group_id = group.id;

        service.add(USER, holes[2], DEFAULT_GROUP_ID).await.unwrap();
        service.add(USER, holes[0], group_id).await.unwrap();
        service.add(USER, holes[1], DEFAULT_GROUP_ID).await.unwrap();

        let query = FavoriteQuery::new(&db);
        assert_eq!(
            query.hole_ids(USER, Some(DEFAULT_GROUP_ID)).await.unwrap(),
            vec![holes[2], holes[1]]
        );
        assert_eq!(
            query.hole_ids(USER, Some(group_id)).await.unwrap(),
            vec![holes[0]]
        );
        assert_eq!(
            query.hole_ids(USER, None).await.unwrap(),
            vec![holes[2], holes[1], holes[0]]
        );
    }

    #[tokio::test]
    async fn test_holes_order_by_id() {
        let db = setup_db().await;
        let holes = create_holes(&db, 3).await;
        let service = FavoriteService::new(&db, FavoriteLimits::default());
        for &hole in &holes {
            service.add(USER, hole, DEFAULT_GROUP_ID).await.unwrap();
        }

        let listed = FavoriteQuery::new(&db)
            .holes(USER, Some(DEFAULT_GROUP_ID), Some(HoleOrder::Id))
            .await
            .unwrap();
        let ids: Vec<i64> = listed.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![holes[2], holes[1], holes[0]]);
    }

    #[tokio::test]
    async fn test_holes_order_by_hole_time_updated() {
        let db = setup_db().await;
        let holes = create_holes(&db, 3).await;
        let service = FavoriteService::new(&db, FavoriteLimits::default());
        for &hole in &holes {
            service.add(USER, hole, DEFAULT_GROUP_ID).await.unwrap();
        }

        set_hole_updated_at(&db, holes[0], "2030-01-01 00:00:00.000").await;
        set_hole_updated_at(&db, holes[1], "2020-01-01 00:00:00.000").await;
        set_hole_updated_at(&db, holes[2], "2030-01-01 00:00:00.000").await;

        let listed = FavoriteQuery::new(&db)
            .holes(USER, Some(DEFAULT_GROUP_ID), Some(HoleOrder::HoleTimeUpdated))
            .await
            .unwrap();
        let ids: Vec<i64> = listed.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![holes[2], holes[0], holes[1]]);
    }

    #[tokio::test]
    async fn test_holes_order_by_time_created() {
        let db = setup_db().await;
        let holes = create_holes(&db, 3).await;
        let service = FavoriteService::new(&db, FavoriteLimits::default());
        for &hole in &holes {
            service.add(USER, hole, DEFAULT_GROUP_ID).await.unwrap();
        }

        set_favorite_created_at(&db, USER, holes[0], "2030-01-01 00:00:00.000").await;
        set_favorite_created_at(&db, USER, holes[1], "2025-01-01 00:00:00.000").await;
        set_favorite_created_at(&db, USER, holes[2], "2025-01-01 00:00:00.000").await;

        let listed = FavoriteQuery::new(&db)
            .holes(USER, Some(DEFAULT_GROUP_ID), Some(HoleOrder::TimeCreated))
            .await
            .unwrap();
        let ids: Vec<i64> = listed.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![holes[0], holes[2], holes[1]]);
    }

    #[tokio::test]
    async fn test_holes_only_for_group_and_user() {
        let db = setup_db().await;
        let holes = create_holes(&db, 3).await;
        let service = FavoriteService::new(&db, FavoriteLimits::default());
        let (group, _) = service.add_group(USER, "g").await.unwrap();
        let group_id = group.id;

        service.add(USER, holes[0], group_id).await.unwrap();
        service.add(USER, holes[1], DEFAULT_GROUP_ID).await.unwrap();
        service.add(USER + 1, holes[2], DEFAULT_GROUP_ID).await.unwrap();

        let query = FavoriteQuery::new(&db);
        let in_group = query
            .holes(USER, Some(group_id), Some(HoleOrder::TimeCreated))
            .await
            .unwrap();
        assert_eq!(in_group.len(), 1);
        assert_eq!(in_group[0].id, holes[0]);

        let all = query.holes(USER, None, None).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_groups_and_snapshot() {
        let db = setup_db().await;
        let holes = create_holes(&db, 2).await;
        let service = FavoriteService::new(&db, FavoriteLimits::default());
        service.add(USER, holes[0], DEFAULT_GROUP_ID).await.unwrap();
        service.add_group(USER, "g").await.unwrap();

        let groups = FavoriteQuery::new(&db)
            .consistent()
            .groups(USER, GroupOrder::Id)
            .await
            .unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].id, DEFAULT_GROUP_ID);
        assert_eq!(groups[1].count, 1);

        let mut conn = db.pool(Access::Read).acquire().await.unwrap();
        let snapshot = FavoriteQuery::snapshot(&mut conn, USER).await.unwrap();
        assert_eq!(snapshot, vec![holes[0]]);
    }
}
