//! Community forum.
//!
//! Posts and comments live in SQLite next to the environmental records.
//! [`Forum`] adds the posting rules on top of a [`ForumStore`]: the author is
//! whoever holds the current session, title/content/comment text must not be
//! blank, and tags are typed as one comma-separated line.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use ecobot_core::error::{AuthError, EcobotError};
use ecobot_core::types::{ForumComment, ForumPost, User};
use ecobot_core::IdentityProvider;

use crate::db::Database;

/// Tag given to a post created without any.
pub const DEFAULT_TAG: &str = "Geral";

/// Length of the id prefix shown in listings and accepted by
/// [`Forum::find_post`].
pub const SHORT_ID_LEN: usize = 8;

// =============================================================================
// Queries
// =============================================================================

/// Listing order for forum posts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ForumSort {
    /// Newest first.
    #[default]
    Recent,
    /// Most liked first.
    Popular,
}

impl FromStr for ForumSort {
    type Err = EcobotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "recent" | "recente" | "recentes" => Ok(ForumSort::Recent),
            "popular" | "populares" => Ok(ForumSort::Popular),
            other => Err(EcobotError::InvalidForumEntry(format!(
                "unknown sort key: {}",
                other
            ))),
        }
    }
}

/// Search and order for [`ForumStore::list_posts`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ForumQuery {
    /// Case-insensitive substring of the title, the content or any tag.
    pub search: Option<String>,
    pub sort: ForumSort,
}

impl ForumQuery {
    pub fn matches(&self, post: &ForumPost) -> bool {
        let needle = match self.search.as_deref().map(|s| s.trim().to_lowercase()) {
            Some(needle) if !needle.is_empty() => needle,
            _ => return true,
        };
        post.title.to_lowercase().contains(&needle)
            || post.content.to_lowercase().contains(&needle)
            || post
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&needle))
    }
}

/// A post as typed by the user, before it has an author or id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    /// Comma-separated, e.g. `"água, temperatura"`.
    pub tags: String,
}

/// Split comma-separated tags, trimming each and dropping blanks. Falls back
/// to [`DEFAULT_TAG`] when nothing is left.
pub fn parse_tags(raw: &str) -> Vec<String> {
    let tags: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect();
    if tags.is_empty() {
        vec![DEFAULT_TAG.to_string()]
    } else {
        tags
    }
}

/// Leading characters of a post id, as shown to users.
pub fn short_id(id: &Uuid) -> String {
    id.to_string().chars().take(SHORT_ID_LEN).collect()
}

/// Activity counters for the forum sidebar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ForumStats {
    pub posts: u64,
    pub comments: u64,
}

// =============================================================================
// Store
// =============================================================================

/// Persistence for posts and their comments.
pub trait ForumStore: Send + Sync {
    /// Every post with its comments, newest first.
    fn all_posts(&self) -> Result<Vec<ForumPost>, EcobotError>;

    /// Store a post together with any comments it already carries.
    fn insert_post(&self, post: &ForumPost) -> Result<(), EcobotError>;

    /// Attach a comment. Fails with [`EcobotError::NotFound`] when the post
    /// does not exist.
    fn insert_comment(&self, comment: &ForumComment) -> Result<(), EcobotError>;

    fn stats(&self) -> Result<ForumStats, EcobotError>;

    /// Posts matching `query.search`, in `query.sort` order.
    fn list_posts(&self, query: &ForumQuery) -> Result<Vec<ForumPost>, EcobotError> {
        let mut posts: Vec<ForumPost> = self
            .all_posts()?
            .into_iter()
            .filter(|p| query.matches(p))
            .collect();
        // Stable: equal keys keep the store's newest-first order.
        match query.sort {
            ForumSort::Recent => posts.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            ForumSort::Popular => posts.sort_by(|a, b| b.likes.cmp(&a.likes)),
        }
        Ok(posts)
    }
}

/// SQLite-backed [`ForumStore`].
pub struct ForumRepository {
    db: Arc<Database>,
}

impl ForumRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Insert [`sample_posts`] when the forum has no posts yet. Returns the
    /// number of posts written.
    pub fn seed_sample_posts(&self) -> Result<usize, EcobotError> {
        if self.stats()?.posts > 0 {
            debug!("Forum already has posts; skipping samples");
            return Ok(0);
        }
        let posts = sample_posts(Utc::now());
        for post in &posts {
            self.insert_post(post)?;
        }
        info!(count = posts.len(), "Seeded sample forum posts");
        Ok(posts.len())
    }
}

impl ForumStore for ForumRepository {
    fn all_posts(&self) -> Result<Vec<ForumPost>, EcobotError> {
        self.db.with_conn(|conn| {
            let mut comments = load_comments(conn)?;

            let mut stmt = conn
                .prepare(
                    "SELECT id, title, content, author_id, author_name, author_avatar,
                            created_at, updated_at, likes, tags
                     FROM forum_posts
                     ORDER BY created_at DESC, rowid DESC",
                )
                .map_err(|e| EcobotError::Storage(format!("Forum query prepare: {}", e)))?;
            let rows = stmt
                .query_map([], |row| Ok(map_post_row(row)))
                .map_err(|e| EcobotError::Storage(format!("Forum query: {}", e)))?;

            let mut posts = Vec::new();
            for row in rows {
                let mut post = row.map_err(|e| EcobotError::Storage(e.to_string()))??;
                post.comments = comments.remove(&post.id).unwrap_or_default();
                posts.push(post);
            }
            Ok(posts)
        })
    }

    fn insert_post(&self, post: &ForumPost) -> Result<(), EcobotError> {
        self.db.with_conn(|conn| {
            let tx = conn
                .unchecked_transaction()
                .map_err(|e| EcobotError::Storage(format!("Begin transaction: {}", e)))?;
            insert_post_row(&tx, post)?;
            for comment in &post.comments {
                insert_comment_row(&tx, comment)?;
            }
            tx.commit()
                .map_err(|e| EcobotError::Storage(format!("Commit: {}", e)))?;
            Ok(())
        })
    }

    fn insert_comment(&self, comment: &ForumComment) -> Result<(), EcobotError> {
        self.db.with_conn(|conn| {
            let exists: bool = conn
                .query_row(
                    "SELECT EXISTS (SELECT 1 FROM forum_posts WHERE id = ?1)",
                    [comment.post_id.to_string()],
                    |row| row.get(0),
                )
                .map_err(|e| EcobotError::Storage(format!("Post lookup: {}", e)))?;
            if !exists {
                return Err(EcobotError::NotFound(format!(
                    "forum post {}",
                    comment.post_id
                )));
            }
            insert_comment_row(conn, comment)
        })
    }

    fn stats(&self) -> Result<ForumStats, EcobotError> {
        self.db.with_conn(|conn| {
            let count = |sql: &str| -> Result<u64, EcobotError> {
                let n: i64 = conn
                    .query_row(sql, [], |row| row.get(0))
                    .map_err(|e| EcobotError::Storage(format!("Forum count: {}", e)))?;
                Ok(n as u64)
            };
            Ok(ForumStats {
                posts: count("SELECT COUNT(*) FROM forum_posts")?,
                comments: count("SELECT COUNT(*) FROM forum_comments")?,
            })
        })
    }
}

fn insert_post_row(conn: &rusqlite::Connection, post: &ForumPost) -> Result<(), EcobotError> {
    let tags = serde_json::to_string(&post.tags)?;
    conn.execute(
        "INSERT INTO forum_posts
             (id, title, content, author_id, author_name, author_avatar,
              created_at, updated_at, likes, tags)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        rusqlite::params![
            post.id.to_string(),
            post.title,
            post.content,
            post.author_id.to_string(),
            post.author_name,
            post.author_avatar,
            post.created_at.timestamp_millis(),
            post.updated_at.timestamp_millis(),
            post.likes,
            tags,
        ],
    )
    .map_err(|e| EcobotError::Storage(format!("Insert post {}: {}", post.id, e)))?;
    Ok(())
}

fn insert_comment_row(
    conn: &rusqlite::Connection,
    comment: &ForumComment,
) -> Result<(), EcobotError> {
    conn.execute(
        "INSERT INTO forum_comments
             (id, post_id, content, author_id, author_name, author_avatar, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            comment.id.to_string(),
            comment.post_id.to_string(),
            comment.content,
            comment.author_id.to_string(),
            comment.author_name,
            comment.author_avatar,
            comment.created_at.timestamp_millis(),
        ],
    )
    .map_err(|e| EcobotError::Storage(format!("Insert comment {}: {}", comment.id, e)))?;
    Ok(())
}

/// Comments grouped by post, oldest first within each post.
fn load_comments(
    conn: &rusqlite::Connection,
) -> Result<HashMap<Uuid, Vec<ForumComment>>, EcobotError> {
    let mut stmt = conn
        .prepare(
            "SELECT id, post_id, content, author_id, author_name, author_avatar, created_at
             FROM forum_comments
             ORDER BY created_at ASC, rowid ASC",
        )
        .map_err(|e| EcobotError::Storage(format!("Comment query prepare: {}", e)))?;
    let rows = stmt
        .query_map([], |row| Ok(map_comment_row(row)))
        .map_err(|e| EcobotError::Storage(format!("Comment query: {}", e)))?;

    let mut by_post: HashMap<Uuid, Vec<ForumComment>> = HashMap::new();
    for row in rows {
        let comment = row.map_err(|e| EcobotError::Storage(e.to_string()))??;
        by_post.entry(comment.post_id).or_default().push(comment);
    }
    Ok(by_post)
}

fn map_post_row(row: &rusqlite::Row<'_>) -> Result<ForumPost, EcobotError> {
    let get_err = |e: rusqlite::Error| EcobotError::Storage(e.to_string());

    let id: String = row.get(0).map_err(get_err)?;
    let title: String = row.get(1).map_err(get_err)?;
    let content: String = row.get(2).map_err(get_err)?;
    let author_id: String = row.get(3).map_err(get_err)?;
    let author_name: String = row.get(4).map_err(get_err)?;
    let author_avatar: Option<String> = row.get(5).map_err(get_err)?;
    let created_at: i64 = row.get(6).map_err(get_err)?;
    let updated_at: i64 = row.get(7).map_err(get_err)?;
    let likes: i64 = row.get(8).map_err(get_err)?;
    let tags: String = row.get(9).map_err(get_err)?;

    Ok(ForumPost {
        id: parse_uuid(&id)?,
        title,
        content,
        author_id: parse_uuid(&author_id)?,
        author_name,
        author_avatar,
        created_at: from_millis(created_at)?,
        updated_at: from_millis(updated_at)?,
        likes: u32::try_from(likes)
            .map_err(|_| EcobotError::Storage(format!("Invalid like count {}", likes)))?,
        comments: Vec::new(),
        tags: serde_json::from_str(&tags)?,
    })
}

fn map_comment_row(row: &rusqlite::Row<'_>) -> Result<ForumComment, EcobotError> {
    let get_err = |e: rusqlite::Error| EcobotError::Storage(e.to_string());

    let id: String = row.get(0).map_err(get_err)?;
    let post_id: String = row.get(1).map_err(get_err)?;
    let content: String = row.get(2).map_err(get_err)?;
    let author_id: String = row.get(3).map_err(get_err)?;
    let author_name: String = row.get(4).map_err(get_err)?;
    let author_avatar: Option<String> = row.get(5).map_err(get_err)?;
    let created_at: i64 = row.get(6).map_err(get_err)?;

    Ok(ForumComment {
        id: parse_uuid(&id)?,
        post_id: parse_uuid(&post_id)?,
        content,
        author_id: parse_uuid(&author_id)?,
        author_name,
        author_avatar,
        created_at: from_millis(created_at)?,
    })
}

fn parse_uuid(raw: &str) -> Result<Uuid, EcobotError> {
    Uuid::parse_str(raw).map_err(|e| EcobotError::Storage(format!("Invalid id {}: {}", raw, e)))
}

fn from_millis(ms: i64) -> Result<DateTime<Utc>, EcobotError> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| EcobotError::Storage(format!("Invalid timestamp {}", ms)))
}

// =============================================================================
// Posting rules
// =============================================================================

/// Forum operations on behalf of the signed-in user.
pub struct Forum {
    store: Arc<dyn ForumStore>,
    identity: Arc<dyn IdentityProvider>,
}

impl Forum {
    pub fn new(store: Arc<dyn ForumStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { store, identity }
    }

    pub fn posts(&self, query: &ForumQuery) -> Result<Vec<ForumPost>, EcobotError> {
        self.store.list_posts(query)
    }

    pub fn stats(&self) -> Result<ForumStats, EcobotError> {
        self.store.stats()
    }

    /// Look a post up by a case-insensitive prefix of its id.
    pub fn find_post(&self, id_prefix: &str) -> Result<ForumPost, EcobotError> {
        let needle = id_prefix.trim().to_lowercase();
        if needle.is_empty() {
            return Err(EcobotError::InvalidForumEntry(
                "post id cannot be empty".to_string(),
            ));
        }
        let mut found = self
            .store
            .all_posts()?
            .into_iter()
            .filter(|p| p.id.to_string().starts_with(&needle));
        match (found.next(), found.next()) {
            (Some(post), None) => Ok(post),
            (None, _) => Err(EcobotError::NotFound(format!("forum post {}", needle))),
            (Some(_), Some(_)) => Err(EcobotError::InvalidForumEntry(format!(
                "ambiguous post id: {}",
                needle
            ))),
        }
    }

    /// Publish a new post authored by the current user.
    pub async fn create_post(&self, draft: &NewPost) -> Result<ForumPost, EcobotError> {
        let title = non_blank(&draft.title, "title")?;
        let content = non_blank(&draft.content, "content")?;
        let author = self.signed_in_user().await?;

        let now = Utc::now();
        let post = ForumPost {
            id: Uuid::new_v4(),
            title,
            content,
            author_id: author.id,
            author_name: author.display_name,
            author_avatar: author.avatar,
            created_at: now,
            updated_at: now,
            likes: 0,
            comments: Vec::new(),
            tags: parse_tags(&draft.tags),
        };
        self.store.insert_post(&post)?;
        info!(post_id = %post.id, author_id = %post.author_id, "Forum post created");
        Ok(post)
    }

    /// Append a comment by the current user to `post_id`.
    pub async fn add_comment(&self, post_id: Uuid, text: &str) -> Result<ForumComment, EcobotError> {
        let content = non_blank(text, "comment")?;
        let author = self.signed_in_user().await?;

        let comment = ForumComment {
            id: Uuid::new_v4(),
            post_id,
            content,
            author_id: author.id,
            author_name: author.display_name,
            author_avatar: author.avatar,
            created_at: Utc::now(),
        };
        self.store.insert_comment(&comment)?;
        info!(post_id = %post_id, comment_id = %comment.id, "Forum comment added");
        Ok(comment)
    }

    async fn signed_in_user(&self) -> Result<User, EcobotError> {
        match self.identity.current_session().await? {
            Some(session) => Ok(session.user),
            None => Err(AuthError::NotSignedIn.into()),
        }
    }
}

fn non_blank(text: &str, field: &str) -> Result<String, EcobotError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(EcobotError::InvalidForumEntry(format!(
            "{} cannot be empty",
            field
        )))
    } else {
        Ok(trimmed.to_string())
    }
}

// =============================================================================
// Starter content
// =============================================================================

/// The forum's starter discussions, dated relative to `now`.
pub fn sample_posts(now: DateTime<Utc>) -> Vec<ForumPost> {
    let maria = (Uuid::from_u128(1), "Maria Silva");
    let joao = (Uuid::from_u128(2), "João Santos");
    let ana = (Uuid::from_u128(3), "Ana Oliveira");

    let post = |author: (Uuid, &str), age: Duration, likes: u32, title: &str, content: &str, tags: &[&str]| {
        let created_at = now - age;
        ForumPost {
            id: Uuid::new_v4(),
            title: title.to_string(),
            content: content.to_string(),
            author_id: author.0,
            author_name: author.1.to_string(),
            author_avatar: None,
            created_at,
            updated_at: created_at,
            likes,
            comments: Vec::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    };
    let comment = |post: &ForumPost, author: (Uuid, &str), age: Duration, content: &str| ForumComment {
        id: Uuid::new_v4(),
        post_id: post.id,
        content: content.to_string(),
        author_id: author.0,
        author_name: author.1.to_string(),
        author_avatar: None,
        created_at: now - age,
    };

    let mut air = post(
        maria,
        Duration::days(2),
        12,
        "Preocupação com a qualidade do ar em São Paulo",
        "Nos últimos dias, tenho notado um aumento significativo na poluição do ar no centro de São Paulo. Alguém mais está acompanhando esses dados? O que podemos fazer para mitigar esse problema?",
        &["Qualidade do Ar", "São Paulo", "Poluição"],
    );
    air.comments = vec![
        comment(
            &air,
            joao,
            Duration::days(1),
            "Também tenho percebido isso. Os dados mostram um aumento de 30% na concentração de partículas finas.",
        ),
        comment(
            &air,
            ana,
            Duration::hours(12),
            "Acredito que devemos pressionar as autoridades locais para implementar políticas de restrição veicular mais rígidas.",
        ),
    ];

    let mut water = post(
        ana,
        Duration::days(5),
        24,
        "Resultados alarmantes na qualidade da água do Rio Tietê",
        "Os últimos dados de monitoramento do Rio Tietê mostram uma deterioração na qualidade da água. Precisamos discutir soluções urgentes para este problema que afeta milhões de pessoas.",
        &["Qualidade da Água", "Rio Tietê", "Poluição"],
    );
    water.comments = vec![comment(
        &water,
        maria,
        Duration::days(4),
        "É realmente preocupante. Estou acompanhando este tema há anos e nunca vi indicadores tão ruins.",
    )];

    let temperature = post(
        joao,
        Duration::days(10),
        8,
        "Aumento das temperaturas no Sudeste",
        "Alguém mais notou como as temperaturas estão mais altas que o normal para esta época do ano? Os dados do último mês mostram uma média 2,5°C acima do esperado.",
        &["Temperatura", "Mudanças Climáticas", "Sudeste"],
    );

    vec![air, water, temperature]
}
