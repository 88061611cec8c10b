pub mod store;

#[cfg(test)]
pub mod memory;

pub use store::*;

use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use std::error::Error;

use crate::models::{Course, User};
use crate::utils::error::AppError;

const DEFAULT_DB_NAME: &str = "course_matcher";
const USERS: &str = "users";
const COURSES: &str = "courses";
const DUPLICATE_KEY: i32 = 11000;

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        // Nome do banco vem do path da URI
        let db_name = client_options
            .default_database
            .clone()
            .unwrap_or_else(|| DEFAULT_DB_NAME.to_string());

        let client = Client::with_options(client_options)?;
        let db = client.database(&db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { db };
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Cria os índices de unicidade e o índice usado pela busca de matches
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        log::info!("🔧 Creating database indexes...");

        let unique = || IndexOptions::builder().unique(true).build();

        let indexes: [(&str, Document, Option<IndexOptions>); 3] = [
            (USERS, doc! { "email": 1 }, Some(unique())),
            (USERS, doc! { "courses": 1 }, None),
            (COURSES, doc! { "crn": 1 }, Some(unique())),
        ];

        for (collection, keys, options) in indexes {
            let label = format!("{}({:?})", collection, keys.keys().collect::<Vec<_>>());
            let model = match options {
                Some(options) => IndexModel::builder().keys(keys).options(options).build(),
                None => IndexModel::builder().keys(keys).build(),
            };

            match self.collection::<Document>(collection).create_index(model).await {
                Ok(_) => log::info!("   ✅ Index ready: {}", label),
                Err(e) => {
                    log::error!("   ❌ Failed to create index {}: {}", label, e);
                    return Err(Box::new(e));
                }
            }
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    fn users(&self) -> Collection<User> {
        self.collection(USERS)
    }

    fn courses(&self) -> Collection<Course> {
        self.collection(COURSES)
    }
}

fn is_duplicate_key(e: &mongodb::error::Error) -> bool {
    matches!(
        e.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

#[async_trait]
impl CourseCatalog for MongoDB {
    async fn find_course_by_id(&self, id: &ObjectId) -> Result<Option<Course>, AppError> {
        Ok(self.courses().find_one(doc! { "_id": *id }).await?)
    }

    async fn find_courses_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<Course>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let cursor = self.courses().find(doc! { "_id": { "$in": ids.to_vec() } }).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_course_by_crn(&self, crn: &str) -> Result<Option<Course>, AppError> {
        Ok(self.courses().find_one(doc! { "crn": crn }).await?)
    }

    async fn list_courses(&self) -> Result<Vec<Course>, AppError> {
        let cursor = self.courses().find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn insert_course(&self, mut course: Course) -> Result<Course, AppError> {
        match self.courses().insert_one(&course).await {
            Ok(result) => {
                course.id = result.inserted_id.as_object_id();
                Ok(course)
            }
            Err(e) if is_duplicate_key(&e) => Err(AppError::Conflict(
                "Course already exists with this CRN.".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn update_course(&self, course: &Course) -> Result<bool, AppError> {
        let id = course
            .id
            .ok_or_else(|| AppError::Internal("Cannot update a course without id".to_string()))?;

        let update = doc! {
            "$set": {
                "crn": &course.crn,
                "subject": &course.subject,
                "courseNumber": &course.course_number,
                "title": &course.title,
                "section": &course.section,
                "instructor": course.instructor.clone(),
                "schedule": course.schedule.clone(),
                "campus": course.campus.clone(),
                "updatedAt": BsonDateTime::now(),
            }
        };

        match self.courses().update_one(doc! { "_id": id }, update).await {
            Ok(result) => Ok(result.matched_count > 0),
            Err(e) if is_duplicate_key(&e) => Err(AppError::Conflict(
                "Course already exists with this CRN.".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_course(&self, id: &ObjectId) -> Result<bool, AppError> {
        let result = self.courses().delete_one(doc! { "_id": *id }).await?;
        Ok(result.deleted_count > 0)
    }
}

#[async_trait]
impl UserDirectory for MongoDB {
    async fn find_user_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError> {
        Ok(self.users().find_one(doc! { "_id": *id }).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users().find_one(doc! { "email": email }).await?)
    }

    async fn insert_user(&self, mut user: User) -> Result<User, AppError> {
        match self.users().insert_one(&user).await {
            Ok(result) => {
                user.id = result.inserted_id.as_object_id();
                Ok(user)
            }
            Err(e) if is_duplicate_key(&e) => {
                Err(AppError::Conflict("User already exists".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_users_with_any_course_in(
        &self,
        ids: &[ObjectId],
        excluding: &ObjectId,
    ) -> Result<Vec<User>, AppError> {
        let filter = doc! {
            "_id": { "$ne": *excluding },
            "courses": { "$in": ids.to_vec() },
        };

        let cursor = self.users().find(filter).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn add_course_if_absent(
        &self,
        user_id: &ObjectId,
        course_id: &ObjectId,
    ) -> Result<bool, AppError> {
        // Filtro + escrita num único update: duas chamadas concorrentes
        // nunca inserem a mesma disciplina duas vezes
        let result = self
            .users()
            .update_one(
                doc! { "_id": *user_id, "courses": { "$ne": *course_id } },
                doc! {
                    "$push": { "courses": *course_id },
                    "$set": { "updatedAt": BsonDateTime::now() },
                },
            )
            .await?;

        Ok(result.modified_count > 0)
    }

    async fn remove_course_if_present(
        &self,
        user_id: &ObjectId,
        course_id: &ObjectId,
    ) -> Result<bool, AppError> {
        let result = self
            .users()
            .update_one(
                doc! { "_id": *user_id, "courses": *course_id },
                doc! {
                    "$pull": { "courses": *course_id },
                    "$set": { "updatedAt": BsonDateTime::now() },
                },
            )
            .await?;

        Ok(result.modified_count > 0)
    }

    async fn remove_course_from_all_users(&self, course_id: &ObjectId) -> Result<u64, AppError> {
        let result = self
            .users()
            .update_many(
                doc! { "courses": *course_id },
                doc! { "$pull": { "courses": *course_id } },
            )
            .await?;

        Ok(result.modified_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongodb_connection() {
        dotenv::dotenv().ok();
        let uri = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/course_matcher_test".to_string());

        let db = MongoDB::new(&uri).await.unwrap();
        assert!(db.health_check().await.is_ok());
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_conditional_add_is_single_copy() {
        dotenv::dotenv().ok();
        let uri = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/course_matcher_test".to_string());
        let db = MongoDB::new(&uri).await.unwrap();

        let email = format!("{}@mytru.ca", ObjectId::new().to_hex());
        let user = db
            .insert_user(User::new(email, "Test".into(), "hash".into()))
            .await
            .unwrap();
        let user_id = user.id.unwrap();
        let course_id = ObjectId::new();

        let (a, b) = tokio::join!(
            db.add_course_if_absent(&user_id, &course_id),
            db.add_course_if_absent(&user_id, &course_id)
        );
        assert!(a.unwrap() ^ b.unwrap());

        let stored = db.find_user_by_id(&user_id).await.unwrap().unwrap();
        assert_eq!(stored.courses, vec![course_id]);

        db.users().delete_one(doc! { "_id": user_id }).await.unwrap();
    }
}
