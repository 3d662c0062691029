//! Row normalization: raw inventory rows into validated records.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use polars::prelude::{DataFrame, StringChunked};
use regex::Regex;

use crate::record::{NormalizedRecord, SpecRawRow};
use crate::spec::{EnumRejectReason, LabelError, SpecColumnNames};

// Octet 0-255 (leading zeros tolerated), optional /0-/32 prefix length.
static RE_CIDR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:[01]?[0-9][0-9]?|2[0-4][0-9]|25[0-5])(?:\.(?:[01]?[0-9][0-9]?|2[0-4][0-9]|25[0-5])){3}(?:/(?:[0-2]?[0-9]|3[0-2]))?$",
    )
    .expect("CIDR pattern compiles")
});

/// Full-string IPv4 address or CIDR block check.
pub fn is_valid_cidr(value: &str) -> bool {
    RE_CIDR.is_match(value)
}

pub(crate) fn validate_host_id(value: &str) -> Result<(), EnumRejectReason> {
    if value.is_empty() {
        return Err(EnumRejectReason::Hostname);
    }
    Ok(())
}

pub(crate) fn validate_address_block(value: &str) -> Result<(), EnumRejectReason> {
    if !is_valid_cidr(value) {
        return Err(EnumRejectReason::AddressBlock);
    }
    Ok(())
}

pub(crate) fn validate_zone(value: &str) -> Result<(), EnumRejectReason> {
    if value.is_empty() {
        return Err(EnumRejectReason::Zone);
    }
    Ok(())
}

/// Normalize one raw row.
///
/// Fields are extracted and checked in the order hostname, subnet, node
/// name; the first failing check rejects the whole row.
pub fn normalize_row(
    row: &SpecRawRow,
    columns: &SpecColumnNames,
) -> Result<NormalizedRecord, EnumRejectReason> {
    let host_id = row.get_text(&columns.col_hostname);
    validate_host_id(&host_id)?;

    let address_block = row.get_text(&columns.col_subnet);
    validate_address_block(&address_block)?;

    let zone = row.get_text(&columns.col_node_name);
    validate_zone(&zone)?;

    Ok(NormalizedRecord::from_validated(host_id, address_block, zone))
}

/// Accepted records of one frame plus rejection counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecNormalizeOutcome {
    pub records: Vec<NormalizedRecord>,
    pub cnt_rejected_by_reason: BTreeMap<EnumRejectReason, u64>,
}

impl SpecNormalizeOutcome {
    pub fn cnt_rejected(&self) -> u64 {
        self.cnt_rejected_by_reason.values().sum()
    }
}

/// Normalize every row of `df`, keeping row order.
///
/// Fails only when one of the hostname/subnet/node-name columns is missing.
pub fn normalize_frame(
    df: &DataFrame,
    columns: &SpecColumnNames,
) -> Result<SpecNormalizeOutcome, LabelError> {
    for c_required in [
        &columns.col_hostname,
        &columns.col_subnet,
        &columns.col_node_name,
    ] {
        if df.column(c_required).is_err() {
            return Err(LabelError::MissingColumn(c_required.clone()));
        }
    }

    let l_colnames: Vec<String> = df
        .get_column_names_str()
        .into_iter()
        .map(ToString::to_string)
        .collect();
    let l_cols_str: Vec<&StringChunked> = df
        .get_columns()
        .iter()
        .map(|col| col.as_materialized_series().str())
        .collect::<Result<_, _>>()?;

    let mut outcome = SpecNormalizeOutcome::default();
    for n_idx_row in 0..df.height() {
        let row = SpecRawRow::from_pairs(
            l_colnames
                .iter()
                .zip(&l_cols_str)
                .map(|(c_name, col)| (c_name.as_str(), col.get(n_idx_row))),
        );
        match normalize_row(&row, columns) {
            Ok(record) => outcome.records.push(record),
            Err(reason) => {
                *outcome.cnt_rejected_by_reason.entry(reason).or_insert(0) += 1;
            }
        }
    }
    Ok(outcome)
}
