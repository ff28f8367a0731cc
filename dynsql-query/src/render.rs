//! Criterion tree rendering.
//!
//! Each top-level criterion becomes one fragment, prefixed by its connector
//! unless it comes first. The first node of a list renders its own predicate
//! followed by the connector of its first sub-criterion and the whole
//! sub-criteria group in one pair of parentheses:
//!
//! ```text
//! column1 = :p1 or (column2 = :p2 and (column3 = :p3))
//! ```
//!
//! Any later node with sub-criteria is wrapped whole, own predicate included,
//! so its connector binds the entire group:
//!
//! ```text
//! column1 = :p1 and (column2 = :p2 or column3 = :p3)
//! ```
//!
//! Placeholders are allocated depth-first, left to right, so the Nth
//! placeholder in the text always carries key `{tag}{N}`.
//!
//! ```rust
//! use dynsql_query::column::SqlColumn;
//! use dynsql_query::condition::{is_equal_to, is_less_than};
//! use dynsql_query::criterion::{self, Criterion};
//! use dynsql_query::placeholder::PlaceholderStyle;
//! use dynsql_query::render::render_criteria;
//!
//! let column1: SqlColumn<i32> = SqlColumn::of("column1");
//! let column2: SqlColumn<i32> = SqlColumn::of("column2");
//!
//! let criteria = vec![
//!     Criterion::new(&column1, is_equal_to(3)),
//!     criterion::and(&column2, is_less_than(5)),
//! ];
//!
//! let clause = render_criteria(&criteria, "p", &PlaceholderStyle::Colon).unwrap();
//! assert_eq!(clause.clause(), "where column1 = :p1 and column2 < :p2");
//! assert_eq!(clause.parameters().len(), 2);
//! ```

use smol_str::SmolStr;
use tracing::{debug, trace};

use crate::column::{RenderableColumn, TypedColumn};
use crate::condition::Condition;
use crate::criterion::{Connector, Criterion};
use crate::error::RenderResult;
use crate::fragment::{FragmentAndParameters, FragmentCollector, Parameters};
use crate::placeholder::{PlaceholderFactory, PlaceholderStyle};
use crate::sequence::{KeySource, ParameterSequence, validate_tag};
use crate::value::ParameterValue;

/// Keyword prefixed to a non-empty predicate body.
pub const WHERE_KEYWORD: &str = "where";

/// How a render pass names parameters and formats text.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Prefix for generated parameter keys.
    pub parameter_tag: SmolStr,
    /// Placeholder syntax.
    pub placeholder: PlaceholderStyle,
    /// Qualify columns with their table alias.
    pub qualify_columns: bool,
    /// Prefix non-empty output with `where `.
    pub where_keyword: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            parameter_tag: SmolStr::new_static("p"),
            placeholder: PlaceholderStyle::default(),
            qualify_columns: true,
            where_keyword: true,
        }
    }
}

impl RenderOptions {
    /// Create default options: tag `p`, MyBatis placeholders, qualified columns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the parameter tag.
    ///
    /// Fails with [`ErrorCode::InvalidConfiguration`](crate::error::ErrorCode)
    /// when the tag is empty or ends in a digit.
    pub fn with_tag(mut self, tag: impl Into<SmolStr>) -> RenderResult<Self> {
        let tag = tag.into();
        validate_tag(&tag)?;
        self.parameter_tag = tag;
        Ok(self)
    }

    /// Set the placeholder style.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: PlaceholderStyle) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Enable or disable table-alias qualification.
    #[must_use]
    pub fn with_qualified_columns(mut self, qualify: bool) -> Self {
        self.qualify_columns = qualify;
        self
    }

    /// Enable or disable the `where ` prefix.
    #[must_use]
    pub fn with_where_keyword(mut self, where_keyword: bool) -> Self {
        self.where_keyword = where_keyword;
        self
    }

    /// A fresh sequence for this tag.
    ///
    /// `parameter_tag` is a public field, so it is checked again here.
    pub fn sequence(&self) -> RenderResult<ParameterSequence> {
        ParameterSequence::new(self.parameter_tag.clone())
    }
}

/// A rendered predicate clause and its parameters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WhereClause {
    clause: String,
    parameters: Parameters,
}

impl WhereClause {
    /// Build the clause from a collector, joining fragments with single spaces.
    pub fn from_collector(collector: FragmentCollector, where_keyword: bool) -> Self {
        let (fragments, parameters) = collector.into_parts();
        let body = fragments.join(" ");
        let clause = if body.is_empty() || !where_keyword {
            body
        } else {
            format!("{} {}", WHERE_KEYWORD, body)
        };
        Self { clause, parameters }
    }

    /// Get the clause text (empty when there were no criteria).
    pub fn clause(&self) -> &str {
        &self.clause
    }

    /// Get the parameters, in placeholder order.
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Check whether the clause is empty.
    pub fn is_empty(&self) -> bool {
        self.clause.is_empty()
    }

    /// Split into clause and parameters.
    pub fn into_parts(self) -> (String, Parameters) {
        (self.clause, self.parameters)
    }
}

/// Walks criterion trees, allocating placeholders from one key source.
#[derive(Debug)]
pub struct CriteriaRenderer<'a, S> {
    placeholders: PlaceholderFactory<'a, S>,
    qualify_columns: bool,
}

impl<'a, S: KeySource> CriteriaRenderer<'a, S> {
    /// Create a renderer.
    pub fn new(keys: S, style: &'a PlaceholderStyle, qualify_columns: bool) -> Self {
        Self {
            placeholders: PlaceholderFactory::new(keys, style),
            qualify_columns,
        }
    }

    /// Give back the key source, positioned after the last allocated key.
    pub fn into_keys(self) -> S {
        self.placeholders.into_keys()
    }

    /// Render one condition against one column.
    pub fn render_condition<T>(
        &mut self,
        column: &dyn RenderableColumn,
        condition: &Condition<T>,
    ) -> RenderResult<FragmentAndParameters>
    where
        T: Clone + Into<ParameterValue>,
    {
        let column_text = condition.render_column(column.render(self.qualify_columns));
        let mut builder = FragmentAndParameters::builder();
        let placeholders = &mut self.placeholders;
        let fragment = condition.render(&column_text, |value| {
            let placeholder = placeholders.next_placeholder();
            builder.parameter(placeholder.key, value.clone().into());
            placeholder.text
        });
        debug_assert_eq!(builder.len(), condition.value_count());
        trace!(column = %column_text, values = condition.value_count(), "rendered condition");
        builder.build(fragment)
    }

    /// Render the first node of a list, without its connector.
    ///
    /// The node's own predicate stays outside the parentheses; its
    /// sub-criteria follow as one group led by the first sub-criterion's
    /// connector.
    pub fn render_node(&mut self, criterion: &Criterion) -> RenderResult<FragmentAndParameters> {
        let own = self.render_condition(criterion.column(), criterion.condition())?;
        let subs = criterion.sub_criteria();
        let Some(first) = subs.first() else {
            return Ok(own);
        };

        let leading = first.connector().unwrap_or(Connector::And);
        let group = self
            .render_list(subs)?
            .map_fragment(|text| format!("{} ({})", leading, text));
        let mut parts = FragmentCollector::new();
        parts.add(own)?;
        parts.add(group)?;
        Ok(parts.into_fragment(" "))
    }

    fn render_list(&mut self, criteria: &[Criterion]) -> RenderResult<FragmentAndParameters> {
        let mut list = FragmentCollector::new();
        for (index, criterion) in criteria.iter().enumerate() {
            list.add(self.render_top_level(criterion, index == 0)?)?;
        }
        Ok(list.into_fragment(" "))
    }

    /// Render a node after the first of its list, without its connector.
    /// A node with sub-criteria is parenthesized whole.
    fn render_trailing(&mut self, criterion: &Criterion) -> RenderResult<FragmentAndParameters> {
        let own = self.render_condition(criterion.column(), criterion.condition())?;
        if !criterion.has_sub_criteria() {
            return Ok(own);
        }

        let mut parts = FragmentCollector::new();
        parts.add(own)?;
        for sub in criterion.sub_criteria() {
            parts.add(self.render_connected(sub)?)?;
        }
        Ok(parts
            .into_fragment(" ")
            .map_fragment(|text| format!("({})", text)))
    }

    fn render_connected(&mut self, criterion: &Criterion) -> RenderResult<FragmentAndParameters> {
        let connector = criterion.connector().unwrap_or(Connector::And);
        Ok(self
            .render_trailing(criterion)?
            .map_fragment(|text| format!("{} {}", connector, text)))
    }

    /// Render a criterion at `first` or later position of its list.
    /// The first one never carries a connector.
    pub fn render_top_level(
        &mut self,
        criterion: &Criterion,
        first: bool,
    ) -> RenderResult<FragmentAndParameters> {
        if first {
            self.render_node(criterion)
        } else {
            self.render_connected(criterion)
        }
    }

    /// Render a root criterion followed by its top-level siblings.
    pub fn render_criteria<'c, I>(
        &mut self,
        root: &'c Criterion,
        additional: I,
    ) -> RenderResult<FragmentCollector>
    where
        I: IntoIterator<Item = &'c Criterion>,
    {
        std::iter::once(root)
            .chain(additional)
            .enumerate()
            .try_fold(FragmentCollector::new(), |mut collector, (index, criterion)| {
                collector.add(self.render_top_level(criterion, index == 0)?)?;
                Ok(collector)
            })
    }

    /// Render a possibly empty list of top-level criteria.
    pub fn render_all(&mut self, criteria: &[Criterion]) -> RenderResult<FragmentCollector> {
        match criteria.split_first() {
            Some((root, rest)) => self.render_criteria(root, rest),
            None => Ok(FragmentCollector::new()),
        }
    }
}

/// Render top-level criteria into a where clause.
pub fn render_criteria(
    criteria: &[Criterion],
    tag: &str,
    placeholder: &PlaceholderStyle,
) -> RenderResult<WhereClause> {
    let options = RenderOptions::new()
        .with_tag(tag)?
        .with_placeholder(placeholder.clone());
    render_with_options(criteria, &options)
}

/// Render top-level criteria into a where clause using `options`.
pub fn render_with_options(
    criteria: &[Criterion],
    options: &RenderOptions,
) -> RenderResult<WhereClause> {
    let mut renderer =
        CriteriaRenderer::new(options.sequence()?, &options.placeholder, options.qualify_columns);
    let collector = renderer.render_all(criteria)?;
    debug!(
        criteria = criteria.len(),
        fragments = collector.fragments().len(),
        parameters = collector.parameters().len(),
        "rendered criteria"
    );
    Ok(WhereClause::from_collector(collector, options.where_keyword))
}

/// Render a single condition against a typed column.
pub fn render_condition<C>(
    condition: &Condition<C::Value>,
    column: &C,
    tag: &str,
    placeholder: &PlaceholderStyle,
) -> RenderResult<FragmentAndParameters>
where
    C: TypedColumn,
    C::Value: Clone + Into<ParameterValue>,
{
    CriteriaRenderer::new(ParameterSequence::new(tag)?, placeholder, true)
        .render_condition(column, condition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{SqlColumn, SqlTable};
    use crate::condition::{is_between, is_equal_to, is_in, is_less_than, is_null};
    use crate::criterion::{and, or};
    use crate::error::ErrorCode;
    use crate::sequence::SharedSequence;
    use pretty_assertions::assert_eq;

    fn columns() -> (SqlColumn<i32>, SqlColumn<i32>, SqlColumn<i32>) {
        (
            SqlColumn::of("column1"),
            SqlColumn::of("column2"),
            SqlColumn::of("column3"),
        )
    }

    fn render(criteria: &[Criterion]) -> WhereClause {
        render_criteria(criteria, "p", &PlaceholderStyle::Colon).unwrap()
    }

    #[test]
    fn test_single_criterion() {
        let (c1, _, _) = columns();
        let clause = render(&[Criterion::new(&c1, is_equal_to(3))]);
        assert_eq!(clause.clause(), "where column1 = :p1");
        assert_eq!(clause.parameters()["p1"], ParameterValue::Int(3));
    }

    #[test]
    fn test_two_top_level_criteria() {
        let (c1, c2, _) = columns();
        let clause = render(&[
            Criterion::new(&c1, is_equal_to(1)),
            and(&c2, is_less_than(2)),
        ]);
        assert_eq!(clause.clause(), "where column1 = :p1 and column2 < :p2");
        assert_eq!(
            clause.parameters().keys().collect::<Vec<_>>(),
            vec!["p1", "p2"]
        );
    }

    #[test]
    fn test_nested_sub_criteria() {
        let (c1, c2, c3) = columns();
        let tree = Criterion::new(&c1, is_equal_to(1)).with_sub_criterion(
            or(&c2, is_equal_to(2)).with_sub_criterion(and(&c3, is_equal_to(3))),
        );
        let clause = render(&[tree]);
        assert_eq!(
            clause.clause(),
            "where column1 = :p1 or (column2 = :p2 and (column3 = :p3))"
        );
        assert_eq!(clause.parameters().len(), 3);
    }

    #[test]
    fn test_group_with_several_subs() {
        let (c1, c2, c3) = columns();
        let clause = render(&[
            Criterion::new(&c1, is_equal_to(1)),
            or(&c2, is_equal_to(4)).with_sub_criteria([
                and(&c2, is_equal_to(6)),
                or(&c3, is_null()),
            ]),
        ]);
        assert_eq!(
            clause.clause(),
            "where column1 = :p1 or (column2 = :p2 and column2 = :p3 or column3 is null)"
        );
    }

    #[test]
    fn test_grouped_criterion_in_the_middle() {
        let (c1, c2, c3) = columns();
        let clause = render(&[
            Criterion::new(&c1, is_equal_to(1)),
            and(&c2, is_equal_to(2)).with_sub_criterion(or(&c3, is_equal_to(3))),
            or(&c1, is_equal_to(4)),
        ]);
        assert_eq!(
            clause.clause(),
            "where column1 = :p1 and (column2 = :p2 or column3 = :p3) or column1 = :p4"
        );

        let clause = render(&[
            Criterion::new(&c1, is_equal_to(1)),
            or(&c2, is_equal_to(2)).with_sub_criterion(and(&c3, is_equal_to(3))),
            and(&c1, is_equal_to(4)),
        ]);
        assert_eq!(
            clause.clause(),
            "where column1 = :p1 or (column2 = :p2 and column3 = :p3) and column1 = :p4"
        );
    }

    #[test]
    fn test_grouped_criterion_at_the_end() {
        let (c1, c2, c3) = columns();
        let clause = render(&[
            Criterion::new(&c1, is_equal_to(1)),
            and(&c2, is_equal_to(2)),
            or(&c3, is_equal_to(3)).with_sub_criterion(and(&c1, is_equal_to(4))),
        ]);
        assert_eq!(
            clause.clause(),
            "where column1 = :p1 and column2 = :p2 or (column3 = :p3 and column1 = :p4)"
        );

        let clause = render(&[
            Criterion::new(&c1, is_equal_to(1)),
            or(&c2, is_equal_to(2)),
            and(&c3, is_equal_to(3)).with_sub_criterion(or(&c1, is_null())),
        ]);
        assert_eq!(
            clause.clause(),
            "where column1 = :p1 or column2 = :p2 and (column3 = :p3 or column1 is null)"
        );
    }

    #[test]
    fn test_grouped_criterion_inside_sub_group() {
        let (c1, c2, c3) = columns();
        let clause = render(&[Criterion::new(&c1, is_equal_to(1)).with_sub_criteria([
            or(&c2, is_equal_to(2)),
            and(&c3, is_equal_to(3)).with_sub_criterion(or(&c1, is_null())),
        ])]);
        assert_eq!(
            clause.clause(),
            "where column1 = :p1 or (column2 = :p2 and (column3 = :p3 or column1 is null))"
        );

        let clause = render(&[Criterion::new(&c1, is_equal_to(1)).with_sub_criteria([
            and(&c2, is_equal_to(2)),
            or(&c3, is_equal_to(3)).with_sub_criteria([
                and(&c1, is_equal_to(4)),
                and(&c2, is_null()),
            ]),
        ])]);
        assert_eq!(
            clause.clause(),
            "where column1 = :p1 and (column2 = :p2 or (column3 = :p3 and column1 = :p4 and column2 is null))"
        );
        assert_eq!(
            clause.parameters().keys().collect::<Vec<_>>(),
            vec!["p1", "p2", "p3", "p4"]
        );
    }

    #[test]
    fn test_grouped_criterion_nested_in_later_group() {
        let (c1, c2, c3) = columns();
        let clause = render(&[
            Criterion::new(&c1, is_equal_to(1)),
            or(&c2, is_equal_to(2)).with_sub_criterion(
                and(&c3, is_equal_to(3)).with_sub_criterion(or(&c1, is_equal_to(4))),
            ),
        ]);
        assert_eq!(
            clause.clause(),
            "where column1 = :p1 or (column2 = :p2 and (column3 = :p3 or column1 = :p4))"
        );
    }

    #[test]
    fn test_ambiguous_tag_rejected_on_every_path() {
        let (c1, _, _) = columns();
        let criteria = [Criterion::new(&c1, is_equal_to(1))];

        let err = render_criteria(&criteria, "p1", &PlaceholderStyle::Colon).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidConfiguration);
        assert_eq!(err.context.parameter_key.as_deref(), Some("p1"));

        let err = render_condition(&is_equal_to(1), &c1, "", &PlaceholderStyle::Colon).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidConfiguration);

        let err = RenderOptions::new().with_tag("x9").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidConfiguration);

        let options = RenderOptions {
            parameter_tag: "x9".into(),
            ..RenderOptions::default()
        };
        let err = render_with_options(&criteria, &options).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidConfiguration);
    }

    #[test]
    fn test_first_connector_is_dropped() {
        let (c1, c2, _) = columns();
        let clause = render(&[or(&c1, is_equal_to(1)), and(&c2, is_equal_to(2))]);
        assert_eq!(clause.clause(), "where column1 = :p1 and column2 = :p2");
    }

    #[test]
    fn test_missing_connector_defaults_to_and() {
        let (c1, c2, _) = columns();
        let clause = render(&[
            Criterion::new(&c1, is_equal_to(1)),
            Criterion::new(&c2, is_equal_to(2)),
        ]);
        assert_eq!(clause.clause(), "where column1 = :p1 and column2 = :p2");
    }

    #[test]
    fn test_empty_criteria() {
        let clause = render(&[]);
        assert!(clause.is_empty());
        assert_eq!(clause.clause(), "");
        assert!(clause.parameters().is_empty());
    }

    #[test]
    fn test_list_and_between_parameters_in_order() {
        let (c1, c2, _) = columns();
        let clause = render(&[
            Criterion::new(&c1, is_in(vec![1, 2, 3]).unwrap()),
            and(&c2, is_between(10, 20)),
        ]);
        assert_eq!(
            clause.clause(),
            "where column1 in (:p1, :p2, :p3) and column2 between :p4 and :p5"
        );
        let values: Vec<_> = clause.parameters().values().cloned().collect();
        assert_eq!(
            values,
            vec![1, 2, 3, 10, 20]
                .into_iter()
                .map(ParameterValue::Int)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_qualified_columns() {
        let table = SqlTable::of("foo").with_alias("a");
        let id: SqlColumn<i32> = SqlColumn::of("id").in_table(&table);
        let criteria = [Criterion::new(&id, is_equal_to(3))];

        let qualified = render_with_options(&criteria, &RenderOptions::new()).unwrap();
        assert_eq!(qualified.clause(), "where a.id = {parameters.p1}");

        let bare = render_with_options(
            &criteria,
            &RenderOptions::new()
                .with_qualified_columns(false)
                .with_where_keyword(false),
        )
        .unwrap();
        assert_eq!(bare.clause(), "id = {parameters.p1}");
    }

    #[test]
    fn test_render_condition_standalone() {
        let (c1, _, _) = columns();
        let rendered =
            render_condition(&is_between(1, 2), &c1, "up", &PlaceholderStyle::At).unwrap();
        assert_eq!(rendered.fragment(), "column1 between @up1 and @up2");
        assert_eq!(rendered.parameters()["up2"], ParameterValue::Int(2));
    }

    #[test]
    fn test_renderer_continues_sequence() {
        let (c1, c2, _) = columns();
        let style = PlaceholderStyle::Colon;
        let keys = ParameterSequence::starting_at("p", 7).unwrap();
        let mut renderer = CriteriaRenderer::new(keys, &style, true);
        let collector = renderer
            .render_criteria(&Criterion::new(&c1, is_equal_to(1)), [&and(&c2, is_equal_to(2))])
            .unwrap();
        assert_eq!(collector.join(" "), "column1 = :p7 and column2 = :p8");
        assert_eq!(renderer.into_keys().peek(), 9);
    }

    #[test]
    fn test_renderers_sharing_a_counter() {
        let (c1, c2, _) = columns();
        let style = PlaceholderStyle::Colon;
        let shared = SharedSequence::new("p").unwrap();

        let first = CriteriaRenderer::new(&shared, &style, true)
            .render_all(&[Criterion::new(&c1, is_between(1, 2))])
            .unwrap();
        let second = CriteriaRenderer::new(&shared, &style, true)
            .render_all(&[Criterion::new(&c2, is_equal_to(3))])
            .unwrap();

        let merged = first.merge(second).unwrap();
        assert_eq!(merged.join(" "), "column1 between :p1 and :p2 column2 = :p3");
        assert_eq!(shared.peek(), 4);
    }
}
