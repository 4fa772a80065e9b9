use sea_orm::{
    ColumnTrait, EntityTrait, QueryFilter, Select,
    sea_query::{Expr, Func, LikeExpr},
};

pub trait FilterContainsIgnoreCase {
    /// Keep rows whose `column` contains `needle`, ignoring case.
    ///
    /// Matches on `LOWER(column) LIKE '%needle%'` so it behaves the same on
    /// Postgres and SQLite. `%`, `_` and `\` in `needle` are matched literally.
    fn filter_contains_ignore_case<C>(self, column: C, needle: &str) -> Self
    where
        C: ColumnTrait;
}

impl<E> FilterContainsIgnoreCase for Select<E>
where
    E: EntityTrait,
{
    fn filter_contains_ignore_case<C>(self, column: C, needle: &str) -> Self
    where
        C: ColumnTrait,
    {
        let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
        self.filter(
            Expr::expr(Func::lower(Expr::col((E::default(), column))))
                .like(LikeExpr::new(pattern).escape('\\')),
        )
    }
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
