//! Composable row predicates over an inventory frame.
//!
//! Each active criteria list becomes one [`SpecRowPredicate`]; the row mask
//! is the AND of all predicate masks. An empty criteria list adds no
//! predicate, so a filter without predicates keeps every row.

use std::collections::HashSet;

use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray, PlSmallStr, StringChunked};
use regex::{Regex, RegexBuilder};

use crate::spec::{EnumMatchMode, LabelError, SpecLabelOptions};

////////////////////////////////////////////////////////////////////////////////
// #region TermMatching

/// Compiled list of zone or server-type terms.
#[derive(Debug, Clone)]
pub struct SpecTermMatcher {
    terms: Vec<String>,
    l_regex_each: Vec<Regex>,
    regex_any_ci: Regex,
}

impl SpecTermMatcher {
    pub fn new(terms: &[String], rule_match: EnumMatchMode) -> Result<Self, LabelError> {
        let l_sources: Vec<String> = terms
            .iter()
            .map(|t| match rule_match {
                EnumMatchMode::Literal => regex::escape(t),
                EnumMatchMode::Regex => t.clone(),
            })
            .collect();

        let compile = |source: &str, if_ci: bool| {
            RegexBuilder::new(source)
                .case_insensitive(if_ci)
                .build()
                .map_err(|e| LabelError::InvalidPattern(format!("Invalid filter pattern: {e}")))
        };

        let l_regex_each = l_sources
            .iter()
            .map(|s| compile(s, false))
            .collect::<Result<Vec<_>, _>>()?;
        let c_any = l_sources
            .iter()
            .map(|s| format!("(?:{s})"))
            .collect::<Vec<_>>()
            .join("|");
        let regex_any_ci = compile(&c_any, true)?;

        Ok(Self {
            terms: terms.to_vec(),
            l_regex_each,
            regex_any_ci,
        })
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Case-insensitive: does `text` contain any term?
    pub fn contains_any_ci(&self, text: &str) -> bool {
        !self.terms.is_empty() && self.regex_any_ci.is_match(text)
    }

    /// Case-sensitive: the first term (in configured order) occurring in `text`.
    pub fn first_occurrence(&self, text: &str) -> Option<&str> {
        self.terms
            .iter()
            .zip(&self.l_regex_each)
            .find(|(_, regex)| regex.is_match(text))
            .map(|(term, _)| term.as_str())
    }
}

/// Derived server-type value per row: the first configured type found in the
/// description, or `""` when none occurs (missing descriptions included).
pub fn derive_server_type_column<'a, I>(descriptions: I, matcher: &SpecTermMatcher) -> Vec<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    descriptions
        .into_iter()
        .map(|desc| {
            desc.and_then(|d| matcher.first_occurrence(d))
                .unwrap_or_default()
                .to_string()
        })
        .collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Predicates

/// One active column predicate.
#[derive(Debug, Clone)]
pub enum SpecRowPredicate {
    /// Type column contains any zone term (case-insensitive).
    ZoneContains {
        column: String,
        matcher: SpecTermMatcher,
    },
    /// Node-name column is one of the names (exact).
    NodeIn {
        column: String,
        set_names: HashSet<String>,
    },
    /// Server type derived from the description column matches a configured type.
    ServerTypeDerived {
        column: String,
        matcher: SpecTermMatcher,
    },
}

impl SpecRowPredicate {
    pub fn column(&self) -> &str {
        match self {
            Self::ZoneContains { column, .. }
            | Self::NodeIn { column, .. }
            | Self::ServerTypeDerived { column, .. } => column,
        }
    }

    /// Per-row truth values; missing cells evaluate to `false`.
    pub fn evaluate(&self, df: &DataFrame) -> Result<Vec<bool>, LabelError> {
        let col = select_str_column(df, self.column())?;
        let l_mask = match self {
            Self::ZoneContains { matcher, .. } => col
                .into_iter()
                .map(|v| v.is_some_and(|s| matcher.contains_any_ci(s)))
                .collect(),
            Self::NodeIn { set_names, .. } => col
                .into_iter()
                .map(|v| v.is_some_and(|s| set_names.contains(s)))
                .collect(),
            Self::ServerTypeDerived { matcher, .. } => derive_server_type_column(col, matcher)
                .iter()
                .map(|derived| {
                    !derived.is_empty() && contains_any_term_ci(derived, matcher.terms())
                })
                .collect(),
        };
        Ok(l_mask)
    }
}

fn contains_any_term_ci(text: &str, terms: &[String]) -> bool {
    let c_text = text.to_lowercase();
    terms.iter().any(|t| c_text.contains(&t.to_lowercase()))
}

fn select_str_column<'a>(df: &'a DataFrame, column: &str) -> Result<&'a StringChunked, LabelError> {
    let col = df
        .column(column)
        .map_err(|_| LabelError::MissingColumn(column.to_string()))?;
    Ok(col.as_materialized_series().str()?)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Filter

/// Conjunction of active predicates.
#[derive(Debug, Clone, Default)]
pub struct SpecRowFilter {
    predicates: Vec<SpecRowPredicate>,
}

impl SpecRowFilter {
    /// Filter without predicates; keeps every row.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Build predicates for the non-empty criteria lists of `options`.
    pub fn from_options(options: &SpecLabelOptions) -> Result<Self, LabelError> {
        let mut filter = Self::identity();

        if !options.zone_filter.is_empty() {
            filter = filter.with_predicate(SpecRowPredicate::ZoneContains {
                column: options.columns.col_type.clone(),
                matcher: SpecTermMatcher::new(&options.zone_filter, options.rule_match_zone)?,
            });
        }
        if !options.node_filter.is_empty() {
            filter = filter.with_predicate(SpecRowPredicate::NodeIn {
                column: options.columns.col_node_name.clone(),
                set_names: options.node_filter.iter().cloned().collect(),
            });
        }
        if !options.server_type_filter.is_empty() {
            filter = filter.with_predicate(SpecRowPredicate::ServerTypeDerived {
                column: options.columns.col_description.clone(),
                matcher: SpecTermMatcher::new(
                    &options.server_type_filter,
                    options.rule_match_server_type,
                )?,
            });
        }

        Ok(filter)
    }

    /// Return a new filter with `predicate` AND-ed in.
    pub fn with_predicate(mut self, predicate: SpecRowPredicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn predicates(&self) -> &[SpecRowPredicate] {
        &self.predicates
    }

    pub fn is_identity(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Row mask: AND of all predicate masks, all-true without predicates.
    pub fn derive_mask(&self, df: &DataFrame) -> Result<BooleanChunked, LabelError> {
        let mut l_mask = vec![true; df.height()];
        for predicate in &self.predicates {
            for (b_keep, b_pred) in l_mask.iter_mut().zip(predicate.evaluate(df)?) {
                *b_keep &= b_pred;
            }
        }
        Ok(BooleanChunked::from_slice(
            PlSmallStr::from_static("mask"),
            &l_mask,
        ))
    }

    /// Rows of `df` selected by the mask, in original order.
    pub fn apply(&self, df: &DataFrame) -> Result<DataFrame, LabelError> {
        if self.is_identity() {
            return Ok(df.clone());
        }
        let mask = self.derive_mask(df)?;
        Ok(df.filter(&mask)?)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use polars::prelude::{Column, DataFrame, NamedFrom, PlSmallStr, Series};
    use proptest::prelude::*;

    use super::*;
    use crate::spec::SpecColumnNames;

    fn make_frame(rows: &[(Option<&str>, Option<&str>, Option<&str>)]) -> DataFrame {
        let columns = SpecColumnNames::default();
        let l_type: Vec<Option<&str>> = rows.iter().map(|r| r.0).collect();
        let l_node: Vec<Option<&str>> = rows.iter().map(|r| r.1).collect();
        let l_desc: Vec<Option<&str>> = rows.iter().map(|r| r.2).collect();
        DataFrame::new(vec![
            Column::from(Series::new(PlSmallStr::from(columns.col_type.as_str()), l_type)),
            Column::from(Series::new(
                PlSmallStr::from(columns.col_node_name.as_str()),
                l_node,
            )),
            Column::from(Series::new(
                PlSmallStr::from(columns.col_description.as_str()),
                l_desc,
            )),
        ])
        .expect("frame")
    }

    fn mask_values(filter: &SpecRowFilter, df: &DataFrame) -> Vec<bool> {
        let mask = filter.derive_mask(df).expect("mask");
        (&mask).into_iter().map(|v| v.unwrap_or(false)).collect()
    }

    fn to_strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn identity_filter_selects_all_rows() {
        let df = make_frame(&[(Some("a"), None, None), (None, None, None)]);
        let filter = SpecRowFilter::from_options(&SpecLabelOptions::default()).expect("filter");
        assert!(filter.is_identity());
        assert_eq!(mask_values(&filter, &df), vec![true, true]);
        assert_eq!(filter.apply(&df).expect("apply").height(), 2);
    }

    #[test]
    fn zone_predicate_is_case_insensitive_substring() {
        let df = make_frame(&[
            (Some("PROD contour"), None, None),
            (Some("test"), None, None),
            (None, None, None),
            (Some("Dev-stand"), None, None),
        ]);
        let options = SpecLabelOptions {
            zone_filter: to_strings(&["prod", "dev"]),
            ..SpecLabelOptions::default()
        };
        let filter = SpecRowFilter::from_options(&options).expect("filter");
        assert_eq!(mask_values(&filter, &df), vec![true, false, false, true]);
    }

    #[test]
    fn zone_literal_mode_escapes_metacharacters() {
        let df = make_frame(&[(Some("zone(1)"), None, None), (Some("zone1"), None, None)]);
        let options = SpecLabelOptions {
            zone_filter: to_strings(&["zone(1)"]),
            ..SpecLabelOptions::default()
        };
        let filter = SpecRowFilter::from_options(&options).expect("filter");
        assert_eq!(mask_values(&filter, &df), vec![true, false]);

        let options = SpecLabelOptions {
            zone_filter: to_strings(&["zone(1)"]),
            rule_match_zone: EnumMatchMode::Regex,
            ..SpecLabelOptions::default()
        };
        let filter = SpecRowFilter::from_options(&options).expect("filter");
        assert_eq!(mask_values(&filter, &df), vec![false, true]);
    }

    #[test]
    fn invalid_regex_term_rejected() {
        let options = SpecLabelOptions {
            zone_filter: to_strings(&["(oops"]),
            rule_match_zone: EnumMatchMode::Regex,
            ..SpecLabelOptions::default()
        };
        let err = SpecRowFilter::from_options(&options).expect_err("invalid");
        assert!(matches!(err, LabelError::InvalidPattern(_)));
    }

    #[test]
    fn node_predicate_is_exact_membership() {
        let df = make_frame(&[
            (None, Some("node-1"), None),
            (None, Some("node-10"), None),
            (None, Some("NODE-1"), None),
        ]);
        let options = SpecLabelOptions {
            node_filter: to_strings(&["node-1"]),
            ..SpecLabelOptions::default()
        };
        let filter = SpecRowFilter::from_options(&options).expect("filter");
        assert_eq!(mask_values(&filter, &df), vec![true, false, false]);
    }

    #[test]
    fn server_type_derivation_picks_first_configured_type() {
        let matcher =
            SpecTermMatcher::new(&to_strings(&["db", "web"]), EnumMatchMode::Literal).expect("m");
        let l_derived = derive_server_type_column(
            [Some("web and db host"), Some("WEB frontend"), None, Some("cache")],
            &matcher,
        );
        assert_eq!(l_derived, vec!["db", "", "", ""]);
    }

    #[test]
    fn server_type_predicate_excludes_rows_without_match() {
        let df = make_frame(&[
            (None, None, Some("Postgres db server")),
            (None, None, Some("nginx")),
            (None, None, None),
        ]);
        let options = SpecLabelOptions {
            server_type_filter: to_strings(&["db"]),
            ..SpecLabelOptions::default()
        };
        let filter = SpecRowFilter::from_options(&options).expect("filter");
        assert_eq!(mask_values(&filter, &df), vec![true, false, false]);
    }

    #[test]
    fn server_type_regex_mode_keeps_pattern_matches() {
        let df = make_frame(&[(None, None, Some("db1 host")), (None, None, Some("db host"))]);
        let options = SpecLabelOptions {
            server_type_filter: to_strings(&[r"db\d"]),
            rule_match_server_type: EnumMatchMode::Regex,
            ..SpecLabelOptions::default()
        };
        let filter = SpecRowFilter::from_options(&options).expect("filter");
        assert_eq!(mask_values(&filter, &df), vec![true, false]);
    }

    #[test]
    fn missing_filter_column_is_reported() {
        let df = DataFrame::new(vec![Column::from(Series::new(
            PlSmallStr::from("other"),
            vec![Some("x")],
        ))])
        .expect("frame");
        let options = SpecLabelOptions {
            node_filter: to_strings(&["n"]),
            ..SpecLabelOptions::default()
        };
        let filter = SpecRowFilter::from_options(&options).expect("filter");
        let err = filter.derive_mask(&df).expect_err("missing column");
        assert!(matches!(err, LabelError::MissingColumn(_)));
    }

    #[test]
    fn apply_keeps_selected_rows_in_order() {
        let df = make_frame(&[
            (Some("prod"), Some("n1"), None),
            (Some("prod"), Some("n2"), None),
            (Some("test"), Some("n1"), None),
            (Some("prod"), Some("n1"), None),
        ]);
        let options = SpecLabelOptions {
            zone_filter: to_strings(&["prod"]),
            node_filter: to_strings(&["n1"]),
            ..SpecLabelOptions::default()
        };
        let filter = SpecRowFilter::from_options(&options).expect("filter");
        let df_out = filter.apply(&df).expect("apply");
        assert_eq!(df_out.height(), 2);
    }

    fn opt_cell() -> impl Strategy<Value = Option<String>> {
        prop::option::of(prop::sample::select(vec![
            "prod a".to_string(),
            "TEST".to_string(),
            "node-1".to_string(),
            "node-2".to_string(),
            "web db".to_string(),
            "cache".to_string(),
        ]))
    }

    proptest! {
        #[test]
        fn mask_equals_and_of_active_predicates(
            rows in prop::collection::vec((opt_cell(), opt_cell(), opt_cell()), 0..20),
            b_zone in any::<bool>(),
            b_node in any::<bool>(),
            b_server in any::<bool>(),
        ) {
            let l_rows: Vec<(Option<&str>, Option<&str>, Option<&str>)> = rows
                .iter()
                .map(|(a, b, c)| (a.as_deref(), b.as_deref(), c.as_deref()))
                .collect();
            let df = make_frame(&l_rows);

            let zone = if b_zone { to_strings(&["prod", "test"]) } else { vec![] };
            let node = if b_node { to_strings(&["node-1"]) } else { vec![] };
            let server = if b_server { to_strings(&["db"]) } else { vec![] };

            let combined = SpecRowFilter::from_options(&SpecLabelOptions {
                zone_filter: zone.clone(),
                node_filter: node.clone(),
                server_type_filter: server.clone(),
                ..SpecLabelOptions::default()
            }).expect("filter");

            let mut l_expected = vec![true; l_rows.len()];
            for single in [
                SpecLabelOptions { zone_filter: zone, ..SpecLabelOptions::default() },
                SpecLabelOptions { node_filter: node, ..SpecLabelOptions::default() },
                SpecLabelOptions { server_type_filter: server, ..SpecLabelOptions::default() },
            ] {
                let filter = SpecRowFilter::from_options(&single).expect("filter");
                for (b_exp, b_single) in l_expected.iter_mut().zip(mask_values(&filter, &df)) {
                    *b_exp &= b_single;
                }
            }

            prop_assert_eq!(mask_values(&combined, &df), l_expected);
        }
    }
}
