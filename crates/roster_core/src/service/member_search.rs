//! Member search use-cases.
//!
//! # Invariants
//! - Absent or blank inputs never narrow a search.
//! - Page totals are counted with the exact filter of the page query.

use crate::model::member::Member;
use crate::query::condition::{age_eq, username_eq, ConditionBuilder, MemberSearchCondition};
use crate::query::expr::ExprOps;
use crate::query::path::{MEMBER, TEAM};
use crate::query::projection::MemberTeamDto;
use crate::query::select::Select;
use crate::repo::member_repo::{DataAccessEngine, RepoError, RepoResult};
use log::debug;

/// One page of search results plus the unpaged match count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberPage {
    pub items: Vec<MemberTeamDto>,
    pub total: u64,
    pub offset: u32,
    pub limit: u32,
}

pub struct MemberSearchService<E: DataAccessEngine> {
    engine: E,
}

impl<E: DataAccessEngine> MemberSearchService<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Username/age search composed with an incremental builder.
    pub fn search_with_builder(
        &self,
        username: Option<&str>,
        age: Option<i64>,
    ) -> RepoResult<Vec<Member>> {
        let mut builder = ConditionBuilder::new();
        builder
            .and(username_eq(MEMBER, username))
            .and(age_eq(MEMBER, age));

        let query = Select::select_from(MEMBER).where_(builder.build());
        self.engine.fetch_members(&query)
    }

    /// Username/age search passing each condition straight to `where`.
    pub fn search_with_where_params(
        &self,
        username: Option<&str>,
        age: Option<i64>,
    ) -> RepoResult<Vec<Member>> {
        let query = Select::select_from(MEMBER)
            .where_all([username_eq(MEMBER, username), age_eq(MEMBER, age)]);
        self.engine.fetch_members(&query)
    }

    /// Members with their team, filtered by `condition`, ordered by
    /// username with unnamed members last.
    pub fn search(&self, condition: &MemberSearchCondition) -> RepoResult<Vec<MemberTeamDto>> {
        let query = search_query(condition)
            .order_by([MEMBER.username().asc().nulls_last(), MEMBER.age().asc()]);
        self.engine.fetch_projected(&query)
    }

    /// One page of [`MemberSearchService::search`] plus the total count.
    pub fn search_page(
        &self,
        condition: &MemberSearchCondition,
        offset: u32,
        limit: u32,
    ) -> RepoResult<MemberPage> {
        let base = search_query(condition);
        let count_query = base.reprojected([MEMBER.count()]);
        let page_query = base
            .order_by([MEMBER.username().asc().nulls_last(), MEMBER.age().asc()])
            .offset(offset)
            .limit(limit);

        let items = self.engine.fetch_projected::<MemberTeamDto>(&page_query)?;
        let total = match self.engine.execute_query(&count_query)?.first() {
            Some(tuple) => tuple.get::<i64>(0)?,
            None => 0,
        };
        debug!(
            "event=member_search_page module=service status=ok offset={offset} limit={limit} items={} total={total}",
            items.len()
        );

        Ok(MemberPage {
            items,
            total: u64::try_from(total).unwrap_or_default(),
            offset,
            limit,
        })
    }

    /// The single member named `username`.
    ///
    /// # Errors
    /// - `NotFound` when nobody has that name (blank names included).
    pub fn find_by_username(&self, username: &str) -> RepoResult<Member> {
        let condition = username_eq(MEMBER, Some(username));
        if condition.is_unconstrained() {
            return Err(RepoError::NotFound("member"));
        }
        let query = Select::select_from(MEMBER).where_all([condition]);
        self.engine.fetch_one_member(&query)
    }
}

fn search_query(condition: &MemberSearchCondition) -> Select {
    Select::select(MemberTeamDto::projection(MEMBER, TEAM))
        .from(MEMBER)
        .left_join(MEMBER.team(), TEAM)
        .where_(condition.to_predicate(MEMBER, TEAM))
}
