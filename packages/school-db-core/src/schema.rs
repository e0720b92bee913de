//! The `ps` schema: teacher and class tables, the teacher view, and the
//! sentinel rows meaning "nobody assigned".

/// Name the database file is attached under.
pub const SCHEMA: &str = "ps";

pub const TEACHER_VIEW: &str = "ps.vTeacher";

/// Identifier reserved for "no teacher" / "no class".
pub const UNASSIGNED_ID: i64 = 0;

/// Tables, indexes, view, and sentinel rows. Safe to run repeatedly.
///
/// Object bodies reference tables unqualified: SQLite resolves them inside
/// the schema that owns the view or index.
pub const DDL: &str = r#"
create table if not exists ps.tTeacher
(
    TeacherId integer primary key autoincrement,
    FirstName text not null,
    LastName  text not null,

    constraint UK_tTeacher_FirstName_LastName unique(FirstName, LastName)
);

create table if not exists ps.tClass
(
    ClassId   integer primary key autoincrement,
    Name      text not null,
    Level     text not null,
    TeacherId integer not null default 0,

    constraint FK_tClass_TeacherId foreign key(TeacherId) references tTeacher(TeacherId)
);

create unique index if not exists ps.IX_tClass_TeacherId
    on tClass(TeacherId)
    where TeacherId <> 0;

insert or ignore into ps.tTeacher(TeacherId, FirstName, LastName) values(0, 'N.A.', 'N.A.');
insert or ignore into ps.tClass(ClassId, Name, Level, TeacherId) values(0, '', '', 0);

create view if not exists ps.vTeacher
as
    select t.TeacherId,
           t.FirstName,
           t.LastName,
           coalesce(c.ClassId, 0) as ClassId,
           coalesce(c.Name, '')   as ClassName,
           coalesce(c.Level, '')  as ClassLevel
    from tTeacher t
        left outer join tClass c on c.TeacherId = t.TeacherId
    where t.TeacherId <> 0;
"#;

/// Objects that must exist for the schema to count as deployed.
pub const REQUIRED_OBJECTS: [(&str, &str); 3] = [
    ("table", "tTeacher"),
    ("table", "tClass"),
    ("view", "vTeacher"),
];

/// Counts how many of [`REQUIRED_OBJECTS`] exist in the `ps` schema.
pub const COUNT_OBJECTS_SQL: &str = r#"
select count(*)
from ps.sqlite_master
where (type = 'table' and name in ('tTeacher', 'tClass'))
   or (type = 'view' and name = 'vTeacher');
"#;
