//! Aliased entity paths and the columns reachable from them.
//!
//! A path is a table plus the alias it is bound to in one statement, so the
//! same table can appear in an outer query (`MEMBER`) and a subquery
//! (`MemberPath::aliased("ms")`) without ambiguity.

use crate::query::expr::Expr;

/// Physical tables of the roster schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Members,
    Teams,
}

const MEMBER_COLUMNS: &[&str] = &["id", "username", "age", "team_id"];
const TEAM_COLUMNS: &[&str] = &["id", "name"];

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Self::Members => "members",
            Self::Teams => "teams",
        }
    }

    /// Entity columns in decode order.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Self::Members => MEMBER_COLUMNS,
            Self::Teams => TEAM_COLUMNS,
        }
    }
}

/// A table bound to an alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Source {
    pub table: Table,
    pub alias: &'static str,
}

/// One column of an aliased source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Column {
    pub source: Source,
    pub name: &'static str,
}

impl Column {
    /// `alias.name`, as written in SQL.
    pub fn qualified(&self) -> String {
        format!("{}.{}", self.source.alias, self.name)
    }
}

/// The `member.team` many-to-one association, joined through `team_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    pub foreign_key: Column,
    pub target: Table,
}

/// Member table bound to an alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberPath {
    source: Source,
}

/// Default member path, alias `m`.
pub const MEMBER: MemberPath = MemberPath::aliased("m");

impl MemberPath {
    pub const fn aliased(alias: &'static str) -> Self {
        Self {
            source: Source {
                table: Table::Members,
                alias,
            },
        }
    }

    pub fn source(self) -> Source {
        self.source
    }

    pub fn id(self) -> Column {
        self.column("id")
    }

    pub fn username(self) -> Column {
        self.column("username")
    }

    pub fn age(self) -> Column {
        self.column("age")
    }

    pub fn team_id(self) -> Column {
        self.column("team_id")
    }

    pub fn team(self) -> Relation {
        Relation {
            foreign_key: self.team_id(),
            target: Table::Teams,
        }
    }

    /// `count(member)`.
    pub fn count(self) -> Expr {
        Expr::Count(self.source)
    }

    fn column(self, name: &'static str) -> Column {
        Column {
            source: self.source,
            name,
        }
    }
}

/// Team table bound to an alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamPath {
    source: Source,
}

/// Default team path, alias `t`.
pub const TEAM: TeamPath = TeamPath::aliased("t");

impl TeamPath {
    pub const fn aliased(alias: &'static str) -> Self {
        Self {
            source: Source {
                table: Table::Teams,
                alias,
            },
        }
    }

    pub fn source(self) -> Source {
        self.source
    }

    pub fn id(self) -> Column {
        Column {
            source: self.source,
            name: "id",
        }
    }

    pub fn name(self) -> Column {
        Column {
            source: self.source,
            name: "name",
        }
    }

    pub fn count(self) -> Expr {
        Expr::Count(self.source)
    }
}

impl From<MemberPath> for Source {
    fn from(value: MemberPath) -> Self {
        value.source
    }
}

impl From<TeamPath> for Source {
    fn from(value: TeamPath) -> Self {
        value.source
    }
}
