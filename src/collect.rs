use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

use crate::panels;
use crate::params::{
    AberrationCoefficients, AdfSettings, ChalcogenSiteDefects, GaussianParameters,
    MaterialProperties, MetalSiteDefects, MicroscopeSettings, ParameterRecord,
};

/// A value as the browser reports it: a number input may hand back either.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct FormValues(HashMap<String, Option<RawValue>>);

impl FormValues {
    fn raw(&self, id: &str) -> Option<&RawValue> {
        self.0.get(id).and_then(|v| v.as_ref())
    }

    pub fn text(&self, id: &str) -> Option<String> {
        match self.raw(id)? {
            RawValue::Text(s) => (!s.trim().is_empty()).then(|| s.clone()),
            RawValue::Number(n) => n.is_finite().then(|| n.to_string()),
        }
    }

    pub fn number(&self, id: &str) -> Option<f64> {
        let n = match self.raw(id)? {
            RawValue::Number(n) => *n,
            RawValue::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        n.is_finite().then_some(n)
    }

    pub fn count(&self, id: &str) -> Option<u32> {
        match self.raw(id)? {
            RawValue::Number(n) if n.fract() == 0.0 && *n >= 0.0 && *n <= u32::MAX as f64 => {
                Some(*n as u32)
            }
            RawValue::Number(_) => None,
            RawValue::Text(s) => s.trim().parse::<u32>().ok(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingRequired(Vec<&'static str>),
}

impl ValidationError {
    pub fn missing(&self) -> &[&'static str] {
        match self {
            ValidationError::MissingRequired(ids) => ids,
        }
    }

    /// Message for the page's alert slot, naming fields by label.
    pub fn alert(&self) -> String {
        let labels: Vec<String> = self
            .missing()
            .iter()
            .map(|id| match panels::field(id) {
                Some(f) => format!("{} ({})", f.label, f.panel.title()),
                None => id.to_string(),
            })
            .collect();
        format!("Missing required fields: {}", labels.join(", "))
    }
}

struct Reader<'a> {
    values: &'a FormValues,
    missing: Vec<&'static str>,
}

impl<'a> Reader<'a> {
    fn text(&mut self, id: &'static str) -> String {
        match self.values.text(id) {
            Some(s) => s,
            None => {
                self.missing.push(id);
                String::new()
            }
        }
    }

    fn number(&mut self, id: &'static str) -> f64 {
        match self.values.number(id) {
            Some(n) => n,
            None => {
                self.missing.push(id);
                0.0
            }
        }
    }

    fn optional(&self, id: &str) -> Option<f64> {
        self.values.number(id)
    }
}

/// Reads every field and assembles a record, or names every missing required field.
pub fn collect(values: &FormValues) -> Result<ParameterRecord, ValidationError> {
    let mut r = Reader {
        values,
        missing: Vec::new(),
    };

    let material_properties = MaterialProperties {
        material_name: r.text("mat-name"),
        pixel_size: r.number("pixel-size"),
        metal_atom_number: r.number("metal-atom"),
        lattice_constant: r.number("lattice-const"),
        image_size: r.number("img-size"),
        chalcogen_atom_number: r.number("chal-atom"),
    };
    let metal_site_defects = MetalSiteDefects {
        substitution_atom_number: r.optional("sub-atom-metal"),
        substitution_concentration: r.optional("metal-sub-conc"),
        vacancy_concentration: r.optional("metal-vac-conc"),
    };
    let chalcogen_site_defects = ChalcogenSiteDefects {
        substitution_atom_number: r.optional("sub-atom-chal"),
        substitution_concentration: r.optional("chal-sub-conc"),
        vacancy_one_concentration: r.optional("vac-one-conc"),
        vacancy_two_concentration: r.optional("vac-two-conc"),
        substitution_one_concentration: r.optional("sub-one-conc"),
        substitution_two_concentration: r.optional("sub-two-conc"),
    };
    let microscope_settings = MicroscopeSettings {
        voltage: r.number("voltage"),
        aperture: r.number("aperture"),
        defocus: r.number("defocus"),
        dwell_time: r.number("dwell-time"),
    };
    let aberration_coefficients = AberrationCoefficients {
        cs3_mean: r.number("cs3-mean"),
        cs3_std: r.number("cs3-std"),
        cs5_mean: r.number("cs5-mean"),
        cs5_std: r.number("cs5-std"),
    };
    let adf_settings = AdfSettings {
        angle_min: r.number("adf-angle-min"),
        angle_max: r.number("adf-angle-max"),
    };
    let gaussian_parameters = GaussianParameters {
        source_size_mean: r.number("src-size-mean"),
        defocus_spread_mean: r.number("defoc-spread-mean"),
        probe_current_mean: r.number("probe-cur-mean"),
        source_size_std: r.number("src-size-std"),
        defocus_spread_std: r.number("defoc-spread-std"),
        probe_current_std: r.number("probe-cur-std"),
    };

    if !r.missing.is_empty() {
        return Err(ValidationError::MissingRequired(r.missing));
    }

    Ok(ParameterRecord {
        batch_size: values.count(panels::BATCH_SIZE_ID),
        material_properties,
        metal_site_defects,
        chalcogen_site_defects,
        microscope_settings,
        aberration_coefficients,
        adf_settings,
        gaussian_parameters,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    impl From<f64> for RawValue {
        fn from(v: f64) -> Self {
            RawValue::Number(v)
        }
    }

    impl From<&str> for RawValue {
        fn from(v: &str) -> Self {
            RawValue::Text(v.to_string())
        }
    }

    impl FormValues {
        pub(crate) fn set(&mut self, id: &str, value: impl Into<RawValue>) {
            self.0.insert(id.to_string(), Some(value.into()));
        }

        pub(crate) fn clear(&mut self, id: &str) {
            self.0.insert(id.to_string(), None);
        }

        pub(crate) fn remove(&mut self, id: &str) {
            self.0.remove(id);
        }
    }

    pub(crate) fn mos2_values() -> FormValues {
        let mut v = FormValues::default();
        v.set("mat-name", "MoS2");
        for (id, n) in [
            ("pixel-size", 0.1),
            ("metal-atom", 42.0),
            ("lattice-const", 3.16),
            ("img-size", 512.0),
            ("chal-atom", 16.0),
            ("voltage", 80.0),
            ("aperture", 30.0),
            ("defocus", 0.0),
            ("dwell-time", 1.0),
            ("cs3-mean", 0.0),
            ("cs3-std", 0.0),
            ("cs5-mean", 0.0),
            ("cs5-std", 0.0),
            ("adf-angle-min", 50.0),
            ("adf-angle-max", 180.0),
            ("src-size-mean", 0.0),
            ("defoc-spread-mean", 0.0),
            ("probe-cur-mean", 0.0),
            ("src-size-std", 0.0),
            ("defoc-spread-std", 0.0),
            ("probe-cur-std", 0.0),
            (panels::BATCH_SIZE_ID, 10.0),
        ] {
            v.set(id, n);
        }
        for f in panels::FIELDS.iter().filter(|f| !f.required) {
            v.set(f.id, 0.0);
        }
        v
    }

    #[test]
    fn test_mos2_scenario() {
        let record = collect(&mos2_values()).unwrap();
        assert_eq!(record.batch_size, Some(10));
        assert_eq!(record.material_properties.material_name, "MoS2");
        assert_eq!(record.material_properties.pixel_size, 0.1);
        assert_eq!(record.material_properties.metal_atom_number, 42.0);
        assert_eq!(record.material_properties.lattice_constant, 3.16);
        assert_eq!(record.material_properties.image_size, 512.0);
        assert_eq!(record.material_properties.chalcogen_atom_number, 16.0);
        assert_eq!(record.microscope_settings.voltage, 80.0);
        assert_eq!(record.microscope_settings.aperture, 30.0);
        assert_eq!(record.microscope_settings.dwell_time, 1.0);
        assert_eq!(record.adf_settings.angle_min, 50.0);
        assert_eq!(record.adf_settings.angle_max, 180.0);
        assert_eq!(record.metal_site_defects.vacancy_concentration, Some(0.0));
        assert_eq!(
            record.chalcogen_site_defects.substitution_two_concentration,
            Some(0.0)
        );
    }

    #[test]
    fn test_each_missing_required_field_rejected() {
        for f in panels::FIELDS.iter().filter(|f| f.required) {
            let mut cleared = mos2_values();
            cleared.clear(f.id);
            assert_eq!(
                collect(&cleared),
                Err(ValidationError::MissingRequired(vec![f.id])),
                "null {}",
                f.id
            );

            let mut blank = mos2_values();
            blank.set(f.id, "");
            assert!(collect(&blank).is_err(), "empty {}", f.id);

            let mut absent = mos2_values();
            absent.remove(f.id);
            assert!(collect(&absent).is_err(), "absent {}", f.id);
        }
    }

    #[test]
    fn test_reports_all_missing_fields() {
        let mut v = mos2_values();
        v.set("mat-name", "  ");
        v.set("voltage", "abc");
        v.clear("probe-cur-std");
        let err = collect(&v).unwrap_err();
        assert_eq!(err.missing(), ["mat-name", "voltage", "probe-cur-std"]);
        assert!(err.alert().starts_with("Missing required fields: Material Name"));
        assert!(err.alert().contains("Voltage (kV) (Microscope Settings)"));
    }

    #[test]
    fn test_optional_fields_pass_through() {
        let mut v = mos2_values();
        v.remove(panels::BATCH_SIZE_ID);
        v.clear("metal-sub-conc");
        v.remove("vac-two-conc");
        v.set("sub-atom-chal", 34.0);
        v.set("chal-sub-conc", "0.25");
        let record = collect(&v).unwrap();
        assert_eq!(record.batch_size, None);
        assert_eq!(record.metal_site_defects.substitution_concentration, None);
        assert_eq!(record.chalcogen_site_defects.vacancy_two_concentration, None);
        assert_eq!(record.chalcogen_site_defects.substitution_atom_number, Some(34.0));
        assert_eq!(record.chalcogen_site_defects.substitution_concentration, Some(0.25));
    }

    #[test]
    fn test_out_of_range_concentration_not_rejected() {
        let mut v = mos2_values();
        v.set("metal-vac-conc", 2.0);
        let record = collect(&v).unwrap();
        assert_eq!(record.metal_site_defects.vacancy_concentration, Some(2.0));
    }

    #[test]
    fn test_numeric_text_accepted() {
        let mut v = mos2_values();
        v.set("voltage", " 200 ");
        v.set(panels::BATCH_SIZE_ID, "25");
        let record = collect(&v).unwrap();
        assert_eq!(record.microscope_settings.voltage, 200.0);
        assert_eq!(record.batch_size, Some(25));
    }

    #[test]
    fn test_text_kept_as_typed() {
        let mut v = mos2_values();
        v.set("mat-name", " MoS2 ");
        let record = collect(&v).unwrap();
        assert_eq!(record.material_properties.material_name, " MoS2 ");
    }

    #[test]
    fn test_non_finite_text_is_missing() {
        for bad in ["inf", "-inf", "NaN"] {
            let mut v = mos2_values();
            v.set("defocus", bad);
            assert_eq!(
                collect(&v),
                Err(ValidationError::MissingRequired(vec!["defocus"])),
                "{bad}"
            );
        }

        let mut v = mos2_values();
        v.set("chal-sub-conc", "NaN");
        let record = collect(&v).unwrap();
        assert_eq!(record.chalcogen_site_defects.substitution_concentration, None);
    }

    #[test]
    fn test_fractional_batch_size_dropped() {
        let mut v = mos2_values();
        v.set(panels::BATCH_SIZE_ID, 7.5);
        assert_eq!(collect(&v).unwrap().batch_size, None);

        v.set(panels::BATCH_SIZE_ID, "7.5");
        assert_eq!(collect(&v).unwrap().batch_size, None);

        v.set(panels::BATCH_SIZE_ID, -10.0);
        assert_eq!(collect(&v).unwrap().batch_size, None);
    }

    #[test]
    fn test_form_values_from_json() {
        let v: FormValues =
            serde_json::from_str(r#"{"voltage": 80, "mat-name": "WSe2", "defocus": null}"#)
                .unwrap();
        assert_eq!(v.number("voltage"), Some(80.0));
        assert_eq!(v.text("mat-name").as_deref(), Some("WSe2"));
        assert_eq!(v.number("defocus"), None);
    }
}
