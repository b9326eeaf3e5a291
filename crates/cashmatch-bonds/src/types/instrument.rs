//! Instrument reference data.

use serde::{Deserialize, Serialize};

use cashmatch_core::Date;

use crate::error::{BondError, BondResult};
use crate::types::StubHint;

/// Reference data for a tradable instrument.
///
/// Only instruments whose `instrument_type` is `"bond"` (case-insensitive)
/// take part in schedule building and portfolio construction. Date and
/// coupon fields are optional because non-bond records share the same shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    /// Unique identifier, typically an ISIN.
    pub id: String,
    /// Short display code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_code: Option<String>,
    /// Descriptive name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Instrument type label, e.g. `"Bond"`.
    pub instrument_type: String,
    /// Issue date.
    #[serde(default)]
    pub issue_date: Option<Date>,
    /// Maturity date.
    #[serde(default)]
    pub maturity_date: Option<Date>,
    /// Quoted coupon rate (unit resolved by `CouponUnit`).
    #[serde(default)]
    pub coupon_rate: Option<f64>,
    /// End of the first coupon period, if irregular.
    #[serde(default)]
    pub first_coupon_date: Option<Date>,
    /// Start of the final regular period, if the last period is a stub.
    #[serde(default)]
    pub last_coupon_date: Option<Date>,
    /// Shape of an irregular first period.
    #[serde(default)]
    pub stub_hint: Option<StubHint>,
}

impl Instrument {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> InstrumentBuilder {
        InstrumentBuilder::default()
    }

    /// True if the instrument type is `"bond"`, ignoring case and
    /// surrounding whitespace.
    pub fn is_bond(&self) -> bool {
        self.instrument_type.trim().eq_ignore_ascii_case("bond")
    }

    /// Display label: the name if present, else the short code, else the id.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.short_code.as_deref())
            .unwrap_or(&self.id)
    }

    /// Checks the record's date invariants.
    ///
    /// Issue must not follow maturity, and a bond must carry both dates.
    pub fn validate(&self) -> BondResult<()> {
        if let (Some(issue), Some(maturity)) = (self.issue_date, self.maturity_date) {
            if issue > maturity {
                return Err(BondError::invalid_instrument(
                    &self.id,
                    format!("issue date {issue} is after maturity {maturity}"),
                ));
            }
        }
        if self.is_bond() {
            if self.issue_date.is_none() {
                return Err(BondError::invalid_instrument(&self.id, "missing issue date"));
            }
            if self.maturity_date.is_none() {
                return Err(BondError::invalid_instrument(&self.id, "missing maturity date"));
            }
        }
        Ok(())
    }
}

/// Builder for [`Instrument`].
#[derive(Debug, Clone, Default)]
pub struct InstrumentBuilder {
    id: Option<String>,
    short_code: Option<String>,
    name: Option<String>,
    instrument_type: Option<String>,
    issue_date: Option<Date>,
    maturity_date: Option<Date>,
    coupon_rate: Option<f64>,
    first_coupon_date: Option<Date>,
    last_coupon_date: Option<Date>,
    stub_hint: Option<StubHint>,
}

impl InstrumentBuilder {
    /// Sets the identifier.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the short code.
    #[must_use]
    pub fn short_code(mut self, code: impl Into<String>) -> Self {
        self.short_code = Some(code.into());
        self
    }

    /// Sets the name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the instrument type. Defaults to `"Bond"`.
    #[must_use]
    pub fn instrument_type(mut self, instrument_type: impl Into<String>) -> Self {
        self.instrument_type = Some(instrument_type.into());
        self
    }

    /// Sets the issue date.
    #[must_use]
    pub fn issue_date(mut self, date: Date) -> Self {
        self.issue_date = Some(date);
        self
    }

    /// Sets the maturity date.
    #[must_use]
    pub fn maturity_date(mut self, date: Date) -> Self {
        self.maturity_date = Some(date);
        self
    }

    /// Sets the quoted coupon rate.
    #[must_use]
    pub fn coupon_rate(mut self, rate: f64) -> Self {
        self.coupon_rate = Some(rate);
        self
    }

    /// Sets the first coupon date.
    #[must_use]
    pub fn first_coupon_date(mut self, date: Date) -> Self {
        self.first_coupon_date = Some(date);
        self
    }

    /// Sets the last regular coupon date.
    #[must_use]
    pub fn last_coupon_date(mut self, date: Date) -> Self {
        self.last_coupon_date = Some(date);
        self
    }

    /// Sets the first-period stub hint.
    #[must_use]
    pub fn stub_hint(mut self, hint: StubHint) -> Self {
        self.stub_hint = Some(hint);
        self
    }

    /// Builds and validates the instrument.
    pub fn build(self) -> BondResult<Instrument> {
        let id = self
            .id
            .ok_or_else(|| BondError::invalid_instrument("<unset>", "missing identifier"))?;

        let instrument = Instrument {
            id,
            short_code: self.short_code,
            name: self.name,
            instrument_type: self.instrument_type.unwrap_or_else(|| "Bond".to_string()),
            issue_date: self.issue_date,
            maturity_date: self.maturity_date,
            coupon_rate: self.coupon_rate,
            first_coupon_date: self.first_coupon_date,
            last_coupon_date: self.last_coupon_date,
            stub_hint: self.stub_hint,
        };
        instrument.validate()?;
        Ok(instrument)
    }
}
