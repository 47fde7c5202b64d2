use mongodb::{Client, Collection, Database};
use std::error::Error;

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Connection pool sized for a single small API instance
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        // Extract database name from URI or use default
        let db_name = uri
            .split('/')
            .last()
            .and_then(|s| s.split('?').next())
            .unwrap_or("tatcon");

        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { client, db };

        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates the indexes the query paths rely on
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        use mongodb::bson::doc;
        use mongodb::options::IndexOptions;
        use mongodb::IndexModel;

        log::info!("🔧 Creating database indexes...");

        // users(email) UNIQUE - the duplicate-registration guard
        let users = self.database().collection::<mongodb::bson::Document>("users");

        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match users.create_index(email_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(email) unique"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // users(user_id) - token subject lookups
        let user_id_index = IndexModel::builder().keys(doc! { "user_id": 1 }).build();

        match users.create_index(user_id_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(user_id)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // events(date) - calendar window queries
        let events = self.database().collection::<mongodb::bson::Document>("events");

        let events_date_index = IndexModel::builder().keys(doc! { "date": 1 }).build();

        match events.create_index(events_date_index).await {
            Ok(_) => log::info!("   ✅ Index created: events(date)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // swipes(user_id, target_id) UNIQUE - one decision per pair, upserted
        let swipes = self.database().collection::<mongodb::bson::Document>("swipes");

        let swipes_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "target_id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match swipes.create_index(swipes_index).await {
            Ok(_) => log::info!("   ✅ Index created: swipes(user_id, target_id) unique"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // matches(user_a) / matches(user_b) - match listing from either side
        let matches = self.database().collection::<mongodb::bson::Document>("matches");

        let matches_a_index = IndexModel::builder().keys(doc! { "user_a": 1 }).build();

        match matches.create_index(matches_a_index).await {
            Ok(_) => log::info!("   ✅ Index created: matches(user_a)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        let matches_b_index = IndexModel::builder().keys(doc! { "user_b": 1 }).build();

        match matches.create_index(matches_b_index).await {
            Ok(_) => log::info!("   ✅ Index created: matches(user_b)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // reminders(status, trigger_at) - the scheduler sweep
        let reminders = self
            .database()
            .collection::<mongodb::bson::Document>("reminders");

        let sweep_index = IndexModel::builder()
            .keys(doc! { "status": 1, "trigger_at": 1 })
            .build();

        match reminders.create_index(sweep_index).await {
            Ok(_) => log::info!("   ✅ Index created: reminders(status, trigger_at)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // reminders(user_id, event_id) - cancel-then-replace lookups
        let reminders_user_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "event_id": 1 })
            .build();

        match reminders.create_index(reminders_user_index).await {
            Ok(_) => log::info!("   ✅ Index created: reminders(user_id, event_id)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongodb_connection() {
        dotenv::dotenv().ok();

        let db = MongoDB::new("mongodb://localhost:27017/tatcon_test").await;
        assert!(db.is_ok());
    }
}
