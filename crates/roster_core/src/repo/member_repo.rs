//! Member/team data-access contract and its SQLite implementation.
//!
//! # Responsibility
//! - Persist entities and answer typed queries built with `crate::query`.
//! - Run bulk update/delete statements and report affected row counts.
//!
//! # Invariants
//! - Entity results pass through the persistence context, so one member id
//!   maps to one managed copy until `invalidate_cache()`.
//! - Engine errors propagate unchanged inside `RepoError::Db`.
//! - Zero rows touched by a bulk statement is `Ok(0)`, not an error.

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::member::{Member, MemberId};
use crate::model::team::{Team, TeamId};
use crate::model::validation::ModelValidationError;
use crate::query::error::{QueryError, QueryResult};
use crate::query::expr::{Expr, ExprOps};
use crate::query::mutation::{BulkDelete, BulkUpdate};
use crate::query::path::{Table, MEMBER};
use crate::query::projection::{assemble, FromTuple};
use crate::query::select::Select;
use crate::query::sql::{render_delete, render_select, render_update, SqlStatement};
use crate::query::tuple::Tuple;
use crate::repo::context::PersistenceContext;
use log::{debug, info};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};
use std::cell::RefCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;
use std::time::Instant;

const REQUIRED_TABLES: &[&str] = &["teams", "members"];

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    Validation(ModelValidationError),
    Db(DbError),
    Query(QueryError),
    /// A single-result query matched nothing.
    NotFound(&'static str),
    /// A single-result query matched this many rows.
    NonUniqueResult(usize),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Query(err) => write!(f, "invalid query: {err}"),
            Self::NotFound(entity) => write!(f, "{entity} not found"),
            Self::NonUniqueResult(count) => {
                write!(f, "expected one result but query returned {count}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match required {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Query(err) => Some(err),
            Self::NotFound(_)
            | Self::NonUniqueResult(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<ModelValidationError> for RepoError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<QueryError> for RepoError {
    fn from(value: QueryError) -> Self {
        Self::Query(value)
    }
}

/// Operations the query layer needs from a persistence engine.
pub trait DataAccessEngine {
    fn persist_team(&self, team: &Team) -> RepoResult<TeamId>;
    fn persist_member(&self, member: &Member) -> RepoResult<MemberId>;
    /// Writes every field of an already persisted member and refreshes its
    /// managed copy.
    fn update_member(&self, member: &Member) -> RepoResult<()>;
    /// Returns the managed copy when loaded, otherwise reads storage.
    fn find_member(&self, id: MemberId) -> RepoResult<Option<Member>>;

    /// Runs `query` and returns raw tuples; no entity management.
    fn execute_query(&self, query: &Select) -> RepoResult<Vec<Tuple>>;
    /// Runs a `select_from(member)` query and returns managed members.
    fn fetch_members(&self, query: &Select) -> RepoResult<Vec<Member>>;
    /// Runs a `(member, team)` query; `None` where an outer join missed.
    fn fetch_member_pairs(&self, query: &Select) -> RepoResult<Vec<(Member, Option<Team>)>>;

    fn execute_bulk_update(&self, update: &BulkUpdate) -> RepoResult<usize>;
    fn execute_bulk_delete(&self, delete: &BulkDelete) -> RepoResult<usize>;
    /// Forgets every managed entity so later reads see storage again.
    fn invalidate_cache(&self);

    /// Exactly one member.
    ///
    /// # Errors
    /// - `NotFound` on zero rows, `NonUniqueResult` on more than one.
    fn fetch_one_member(&self, query: &Select) -> RepoResult<Member> {
        let mut members = self.fetch_members(query)?;
        match members.len() {
            0 => Err(RepoError::NotFound("member")),
            1 => Ok(members.remove(0)),
            count => Err(RepoError::NonUniqueResult(count)),
        }
    }

    fn fetch_projected<T: FromTuple>(&self, query: &Select) -> RepoResult<Vec<T>>
    where
        Self: Sized,
    {
        let tuples = self.execute_query(query)?;
        Ok(assemble(&tuples)?)
    }

    /// Members pointing at `team_id`, by username with unnamed members last.
    fn members_of_team(&self, team_id: TeamId) -> RepoResult<Vec<Member>> {
        let query = Select::select_from(MEMBER)
            .where_(MEMBER.team_id().eq(team_id))
            .order_by([MEMBER.username().asc().nulls_last()]);
        self.fetch_members(&query)
    }
}

impl<E: DataAccessEngine + ?Sized> DataAccessEngine for &E {
    fn persist_team(&self, team: &Team) -> RepoResult<TeamId> {
        (**self).persist_team(team)
    }

    fn persist_member(&self, member: &Member) -> RepoResult<MemberId> {
        (**self).persist_member(member)
    }

    fn update_member(&self, member: &Member) -> RepoResult<()> {
        (**self).update_member(member)
    }

    fn find_member(&self, id: MemberId) -> RepoResult<Option<Member>> {
        (**self).find_member(id)
    }

    fn execute_query(&self, query: &Select) -> RepoResult<Vec<Tuple>> {
        (**self).execute_query(query)
    }

    fn fetch_members(&self, query: &Select) -> RepoResult<Vec<Member>> {
        (**self).fetch_members(query)
    }

    fn fetch_member_pairs(&self, query: &Select) -> RepoResult<Vec<(Member, Option<Team>)>> {
        (**self).fetch_member_pairs(query)
    }

    fn execute_bulk_update(&self, update: &BulkUpdate) -> RepoResult<usize> {
        (**self).execute_bulk_update(update)
    }

    fn execute_bulk_delete(&self, delete: &BulkDelete) -> RepoResult<usize> {
        (**self).execute_bulk_delete(delete)
    }

    fn invalidate_cache(&self) {
        (**self).invalidate_cache()
    }
}

/// SQLite-backed engine borrowing one migrated connection.
pub struct SqliteMemberRepository<'conn> {
    conn: &'conn Connection,
    context: RefCell<PersistenceContext>,
}

impl<'conn> SqliteMemberRepository<'conn> {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version is not current.
    /// - `MissingRequiredTable` when `teams` or `members` is absent.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self {
            conn,
            context: RefCell::new(PersistenceContext::default()),
        })
    }

    /// Number of members currently managed.
    pub fn managed_member_count(&self) -> usize {
        self.context.borrow().len()
    }

    fn run(&self, statement: &SqlStatement) -> RepoResult<Vec<Tuple>> {
        let started_at = Instant::now();
        let mut stmt = self.conn.prepare(&statement.sql)?;
        let labels: Rc<[String]> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let width = labels.len();

        let mut rows = stmt.query(params_from_iter(statement.binds.iter()))?;
        let mut tuples = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(width);
            for index in 0..width {
                values.push(row.get::<_, Value>(index)?);
            }
            tuples.push(Tuple::new(Rc::clone(&labels), values));
        }

        debug!(
            "event=query_execute module=repo status=ok columns={} rows={} binds={} duration_ms={}",
            width,
            tuples.len(),
            statement.binds.len(),
            started_at.elapsed().as_millis()
        );
        Ok(tuples)
    }

    fn execute(&self, event: &str, table: Table, statement: &SqlStatement) -> RepoResult<usize> {
        let started_at = Instant::now();
        let affected = self
            .conn
            .execute(&statement.sql, params_from_iter(statement.binds.iter()))?;
        info!(
            "event={event} module=repo status=ok table={} affected={affected} duration_ms={}",
            table.name(),
            started_at.elapsed().as_millis()
        );
        Ok(affected)
    }
}

impl DataAccessEngine for SqliteMemberRepository<'_> {
    fn persist_team(&self, team: &Team) -> RepoResult<TeamId> {
        team.validate()?;
        self.conn.execute(
            "INSERT INTO teams (id, name) VALUES (?1, ?2);",
            params![team.id.to_string(), team.name.as_str()],
        )?;
        Ok(team.id)
    }

    fn persist_member(&self, member: &Member) -> RepoResult<MemberId> {
        member.validate()?;
        self.conn.execute(
            "INSERT INTO members (id, username, age, team_id) VALUES (?1, ?2, ?3, ?4);",
            params![
                member.id.to_string(),
                member.username.as_deref(),
                member.age,
                member.team_id.map(|id| id.to_string()),
            ],
        )?;
        self.context.borrow_mut().register(member.clone());
        Ok(member.id)
    }

    fn update_member(&self, member: &Member) -> RepoResult<()> {
        member.validate()?;
        let changed = self.conn.execute(
            "UPDATE members SET username = ?2, age = ?3, team_id = ?4 WHERE id = ?1;",
            params![
                member.id.to_string(),
                member.username.as_deref(),
                member.age,
                member.team_id.map(|id| id.to_string()),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound("member"));
        }
        self.context.borrow_mut().register(member.clone());
        Ok(())
    }

    fn find_member(&self, id: MemberId) -> RepoResult<Option<Member>> {
        let cached = self.context.borrow().get(id);
        if cached.is_some() {
            return Ok(cached);
        }

        let query = Select::select_from(MEMBER).where_(MEMBER.id().eq(id));
        Ok(self.fetch_members(&query)?.into_iter().next())
    }

    fn execute_query(&self, query: &Select) -> RepoResult<Vec<Tuple>> {
        let statement = render_select(query)?;
        self.run(&statement)
    }

    fn fetch_members(&self, query: &Select) -> RepoResult<Vec<Member>> {
        expect_entities(query, &[Table::Members], "(member)")?;
        let tuples = self.execute_query(query)?;

        let mut context = self.context.borrow_mut();
        tuples
            .iter()
            .map(|tuple| -> RepoResult<Member> { Ok(context.attach(member_at(tuple, 0)?)) })
            .collect()
    }

    fn fetch_member_pairs(&self, query: &Select) -> RepoResult<Vec<(Member, Option<Team>)>> {
        expect_entities(query, &[Table::Members, Table::Teams], "(member, team)")?;
        let tuples = self.execute_query(query)?;
        let team_offset = Table::Members.columns().len();

        let mut context = self.context.borrow_mut();
        tuples
            .iter()
            .map(|tuple| -> RepoResult<(Member, Option<Team>)> {
                let member = context.attach(member_at(tuple, 0)?);
                Ok((member, team_at(tuple, team_offset)?))
            })
            .collect()
    }

    fn execute_bulk_update(&self, update: &BulkUpdate) -> RepoResult<usize> {
        let statement = render_update(update)?;
        self.execute("bulk_update", update.target().table, &statement)
    }

    fn execute_bulk_delete(&self, delete: &BulkDelete) -> RepoResult<usize> {
        let statement = render_delete(delete)?;
        self.execute("bulk_delete", delete.target().table, &statement)
    }

    fn invalidate_cache(&self) {
        let evicted = self.context.borrow_mut().clear();
        info!("event=cache_invalidate module=repo status=ok evicted={evicted}");
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in REQUIRED_TABLES {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
            [*table],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(RepoError::MissingRequiredTable(*table));
        }
    }

    Ok(())
}

fn expect_entities(query: &Select, tables: &[Table], shape: &'static str) -> QueryResult<()> {
    let projection = query.projection();
    let matches = projection.len() == tables.len()
        && projection
            .iter()
            .zip(tables)
            .all(|(expr, table)| matches!(expr, Expr::Entity(source) if source.table == *table));
    if !matches {
        return Err(QueryError::UnexpectedProjection(shape));
    }
    Ok(())
}

fn member_at(tuple: &Tuple, offset: usize) -> QueryResult<Member> {
    Ok(Member {
        id: tuple.get(offset)?,
        username: tuple.get(offset + 1)?,
        age: tuple.get(offset + 2)?,
        team_id: tuple.get(offset + 3)?,
    })
}

fn team_at(tuple: &Tuple, offset: usize) -> QueryResult<Option<Team>> {
    let Some(id) = tuple.get::<Option<TeamId>>(offset)? else {
        return Ok(None);
    };
    Ok(Some(Team {
        id,
        name: tuple.get(offset + 1)?,
    }))
}
