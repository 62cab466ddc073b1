//! Terminal chat shell.
//!
//! Free text goes to the chat session. Lines starting with `:` are shell
//! commands that reach the record store, the forum and the identity provider.

use std::sync::Arc;

use ecobot_chat::ChatSession;
use ecobot_core::types::{EnvironmentalRecord, ForumPost, RecordType};
use ecobot_core::IdentityProvider;
use ecobot_storage::{
    critical_alerts, short_id, status_progress, Forum, ForumQuery, ForumSort, NewPost,
    RecordQuery, RecordSort, RecordStore,
};

const HELP: &str = concat!(
    "Comandos:\n",
    "  :dados [tipo] [busca] [ordem]       lista registros\n",
    "      tipo: ar, agua, temperatura, todos | ordem: local, valor, status, data\n",
    "  :alertas                            registros em condição ruim ou perigosa\n",
    "  :forum [busca] [ordem]              discussões da comunidade\n",
    "      ordem: recentes, populares\n",
    "  :postar <título> | <texto> [| tags] nova discussão (tags separadas por vírgula)\n",
    "  :comentar <id> <texto>              comentar uma discussão\n",
    "  :login <email> <senha>              entrar\n",
    "  :registrar <nome> <email> <senha>   criar conta\n",
    "  :sair                               encerrar a sessão de usuário\n",
    "  :quem                               usuário conectado\n",
    "  :historico                          conversa em JSON\n",
    "  :fim                                fechar o EcoBot",
);

// =============================================================================
// Command parsing
// =============================================================================

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Chat(String),
    Data(RecordQuery),
    Alerts,
    Forum(ForumQuery),
    Post(NewPost),
    Comment { post: String, text: String },
    Login { email: String, password: String },
    Register { name: String, email: String, password: String },
    Logout,
    WhoAmI,
    History,
    Help,
    Quit,
    Invalid(String),
}

impl ShellCommand {
    pub fn parse(line: &str) -> Self {
        let Some(rest) = line.trim().strip_prefix(':') else {
            return ShellCommand::Chat(line.to_string());
        };
        let rest = rest.trim();
        let (name, raw_args) = match rest.split_once(char::is_whitespace) {
            Some((name, tail)) => (name, tail.trim()),
            None => (rest, ""),
        };
        if name.is_empty() {
            return ShellCommand::Help;
        }
        let args: Vec<&str> = raw_args.split_whitespace().collect();

        match name.to_lowercase().as_str() {
            "dados" => ShellCommand::Data(parse_data_args(&args)),
            "alertas" => ShellCommand::Alerts,
            "forum" | "fórum" => ShellCommand::Forum(parse_forum_args(&args)),
            "postar" => parse_post_args(raw_args),
            "comentar" => match raw_args.split_once(char::is_whitespace) {
                Some((post, text)) if !text.trim().is_empty() => ShellCommand::Comment {
                    post: post.to_string(),
                    text: text.trim().to_string(),
                },
                _ => ShellCommand::Invalid("uso: :comentar <id> <texto>".to_string()),
            },
            "login" => match args.as_slice() {
                [email, password] => ShellCommand::Login {
                    email: email.to_string(),
                    password: password.to_string(),
                },
                _ => ShellCommand::Invalid("uso: :login <email> <senha>".to_string()),
            },
            "registrar" => match args.as_slice() {
                [name @ .., email, password] if !name.is_empty() => ShellCommand::Register {
                    name: name.join(" "),
                    email: email.to_string(),
                    password: password.to_string(),
                },
                _ => ShellCommand::Invalid("uso: :registrar <nome> <email> <senha>".to_string()),
            },
            "sair" => ShellCommand::Logout,
            "quem" => ShellCommand::WhoAmI,
            "historico" | "histórico" => ShellCommand::History,
            "ajuda" | "help" => ShellCommand::Help,
            "fim" | "quit" => ShellCommand::Quit,
            other => ShellCommand::Invalid(format!("comando desconhecido: :{}", other)),
        }
    }
}

/// `[tipo] [busca...] [ordem]`: a leading type and a trailing sort key are
/// recognised; whatever sits between them is the location search.
fn parse_data_args(args: &[&str]) -> RecordQuery {
    let mut query = RecordQuery::default();
    let mut rest = args;

    if let Some((first, tail)) = rest.split_first() {
        if matches!(first.to_lowercase().as_str(), "todos" | "all") {
            rest = tail;
        } else if let Ok(record_type) = first.parse::<RecordType>() {
            query.record_type = Some(record_type);
            rest = tail;
        }
    }
    if let Some((last, head)) = rest.split_last() {
        if let Ok(sort) = last.parse::<RecordSort>() {
            query.sort = sort;
            rest = head;
        }
    }
    if !rest.is_empty() {
        query.search_text = Some(rest.join(" "));
    }
    query
}

/// `[busca...] [ordem]`: a trailing sort key is recognised, the rest is the
/// search text.
fn parse_forum_args(args: &[&str]) -> ForumQuery {
    let mut query = ForumQuery::default();
    let mut rest = args;
    if let Some((last, head)) = rest.split_last() {
        if let Ok(sort) = last.parse::<ForumSort>() {
            query.sort = sort;
            rest = head;
        }
    }
    if !rest.is_empty() {
        query.search = Some(rest.join(" "));
    }
    query
}

/// `<título> | <texto> [| tags]`.
fn parse_post_args(raw: &str) -> ShellCommand {
    let parts: Vec<&str> = raw.splitn(3, '|').map(str::trim).collect();
    match parts.as_slice() {
        [title, content] => ShellCommand::Post(NewPost {
            title: title.to_string(),
            content: content.to_string(),
            tags: String::new(),
        }),
        [title, content, tags] => ShellCommand::Post(NewPost {
            title: title.to_string(),
            content: content.to_string(),
            tags: tags.to_string(),
        }),
        _ => ShellCommand::Invalid("uso: :postar <título> | <texto> [| tags]".to_string()),
    }
}

// =============================================================================
// Shell
// =============================================================================

/// What the REPL should do after a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellOutcome {
    Print(String),
    Quit,
}

/// Session, store, forum and identity provider wired together for the REPL.
pub struct Shell {
    session: ChatSession,
    store: Arc<dyn RecordStore>,
    forum: Forum,
    identity: Arc<dyn IdentityProvider>,
}

impl Shell {
    pub fn new(
        session: ChatSession,
        store: Arc<dyn RecordStore>,
        forum: Forum,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            session,
            store,
            forum,
            identity,
        }
    }

    /// Text to show before the first prompt.
    pub fn greeting(&self) -> String {
        self.session
            .turns()
            .first()
            .map(|t| t.content.clone())
            .unwrap_or_default()
    }

    pub async fn handle_line(&self, line: &str) -> ShellOutcome {
        match ShellCommand::parse(line) {
            ShellCommand::Chat(text) => match self.session.submit(&text).await {
                Ok(turn) if turn.has_links => ShellOutcome::Print(format!(
                    "{}\n\n🔗 Esta resposta contém links externos.",
                    turn.content
                )),
                Ok(turn) => ShellOutcome::Print(turn.content),
                Err(e) => ShellOutcome::Print(format!("⚠ {}", e)),
            },
            ShellCommand::Data(query) => ShellOutcome::Print(self.list_records(&query)),
            ShellCommand::Alerts => ShellOutcome::Print(self.list_alerts()),
            ShellCommand::Forum(query) => ShellOutcome::Print(self.list_posts(&query)),
            ShellCommand::Post(draft) => match self.forum.create_post(&draft).await {
                Ok(post) => ShellOutcome::Print(format!(
                    "Discussão publicada [{}].",
                    short_id(&post.id)
                )),
                Err(e) => notice(e),
            },
            ShellCommand::Comment { post, text } => {
                let target = match self.forum.find_post(&post) {
                    Ok(target) => target,
                    Err(e) => return notice(e),
                };
                match self.forum.add_comment(target.id, &text).await {
                    Ok(_) => ShellOutcome::Print("Comentário adicionado.".to_string()),
                    Err(e) => notice(e),
                }
            }
            ShellCommand::Login { email, password } => {
                match self.identity.sign_in(&email, &password).await {
                    Ok(session) => ShellOutcome::Print(format!(
                        "Bem-vindo(a), {}!",
                        session.user.display_name
                    )),
                    Err(e) => notice(e),
                }
            }
            ShellCommand::Register {
                name,
                email,
                password,
            } => match self.identity.sign_up(&name, &email, &password).await {
                Ok(session) => ShellOutcome::Print(format!(
                    "Conta criada. Bem-vindo(a), {}!",
                    session.user.display_name
                )),
                Err(e) => notice(e),
            },
            ShellCommand::Logout => match self.identity.sign_out().await {
                Ok(()) => ShellOutcome::Print("Sessão encerrada.".to_string()),
                Err(e) => notice(e),
            },
            ShellCommand::WhoAmI => match self.identity.current_session().await {
                Ok(Some(s)) => ShellOutcome::Print(format!(
                    "{} <{}>",
                    s.user.display_name, s.user.email
                )),
                Ok(None) => ShellOutcome::Print("Nenhum usuário conectado.".to_string()),
                Err(e) => notice(e),
            },
            ShellCommand::History => match self.session.export_json() {
                Ok(json) => ShellOutcome::Print(json),
                Err(e) => ShellOutcome::Print(format!("⚠ {}", e)),
            },
            ShellCommand::Help => ShellOutcome::Print(HELP.to_string()),
            ShellCommand::Quit => ShellOutcome::Quit,
            ShellCommand::Invalid(msg) => ShellOutcome::Print(format!("⚠ {}", msg)),
        }
    }

    fn list_records(&self, query: &RecordQuery) -> String {
        match self.store.query_records(query) {
            Ok(records) if records.is_empty() => "Nenhum registro encontrado.".to_string(),
            Ok(records) => records
                .iter()
                .map(format_record)
                .collect::<Vec<_>>()
                .join("\n"),
            Err(e) => {
                tracing::warn!(error = %e, "Record query failed");
                format!("⚠ {}", e)
            }
        }
    }

    fn list_alerts(&self) -> String {
        let records = match self.store.query_records(&RecordQuery::default()) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "Record query failed");
                return format!("⚠ {}", e);
            }
        };
        let alerts = critical_alerts(&records);
        if alerts.is_empty() {
            return "Nenhum alerta no momento.".to_string();
        }
        let mut lines = vec![format!(
            "⚠ {} pontos de monitoramento apresentam condições preocupantes.",
            alerts.len()
        )];
        lines.extend(alerts.into_iter().map(format_record));
        lines.join("\n")
    }

    fn list_posts(&self, query: &ForumQuery) -> String {
        let posts = match self.forum.posts(query) {
            Ok(posts) => posts,
            Err(e) => {
                tracing::warn!(error = %e, "Forum query failed");
                return format!("⚠ {}", e);
            }
        };
        if posts.is_empty() {
            let hint = match query.search.as_deref().map(str::trim) {
                Some(s) if !s.is_empty() => "Tente uma busca diferente.",
                _ => "Seja o primeiro a iniciar uma discussão!",
            };
            return format!("Nenhuma discussão encontrada. {}", hint);
        }

        let mut blocks: Vec<String> = posts.iter().map(format_post).collect();
        match self.forum.stats() {
            Ok(stats) => blocks.push(format!(
                "Discussões: {} | Comentários: {}",
                stats.posts, stats.comments
            )),
            Err(e) => tracing::warn!(error = %e, "Forum stats failed"),
        }
        blocks.join("\n\n")
    }
}

fn notice(err: ecobot_core::EcobotError) -> ShellOutcome {
    tracing::debug!(error = %err, "Request failed");
    ShellOutcome::Print(format!("⚠ {}", err))
}

fn type_label(record_type: RecordType) -> &'static str {
    match record_type {
        RecordType::Air => "Ar",
        RecordType::Water => "Água",
        RecordType::Temperature => "Temperatura",
    }
}

fn format_record(record: &EnvironmentalRecord) -> String {
    let gauge = status_progress(record.value, record.record_type);
    format!(
        "{} | {} | {} {} | {} ({:.0}%) | {} {}",
        record.location,
        type_label(record.record_type),
        record.value,
        record.unit,
        record.status,
        gauge.percent,
        record.recorded_at.format("%d/%m/%Y %H:%M"),
        record.weekday()
    )
}

fn format_post(post: &ForumPost) -> String {
    let mut lines = vec![
        format!("[{}] {} (👍 {})", short_id(&post.id), post.title, post.likes),
        format!("  Tags: {}", post.tags.join(", ")),
        format!("  {}", post.content),
        format!(
            "  por {} em {}",
            post.author_name,
            post.created_at.format("%d/%m/%Y")
        ),
        format!("  Comentários ({}):", post.comments.len()),
    ];
    lines.extend(post.comments.iter().map(|c| {
        format!(
            "    - {} ({}): {}",
            c.author_name,
            c.created_at.format("%d/%m/%Y"),
            c.content
        )
    }));
    lines.join("\n")
}
