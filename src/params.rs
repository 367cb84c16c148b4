use serde::{Deserialize, Serialize};

// Serialized field names are the record format handed to the synthesis engine.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterRecord {
    pub batch_size: Option<u32>,
    pub material_properties: MaterialProperties,
    pub metal_site_defects: MetalSiteDefects,
    pub chalcogen_site_defects: ChalcogenSiteDefects,
    pub microscope_settings: MicroscopeSettings,
    pub aberration_coefficients: AberrationCoefficients,
    pub adf_settings: AdfSettings,
    pub gaussian_parameters: GaussianParameters,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialProperties {
    pub material_name: String,
    pub pixel_size: f64,
    pub metal_atom_number: f64,
    pub lattice_constant: f64,
    pub image_size: f64,
    pub chalcogen_atom_number: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetalSiteDefects {
    pub substitution_atom_number: Option<f64>,
    pub substitution_concentration: Option<f64>,
    pub vacancy_concentration: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChalcogenSiteDefects {
    pub substitution_atom_number: Option<f64>,
    pub substitution_concentration: Option<f64>,
    pub vacancy_one_concentration: Option<f64>,
    pub vacancy_two_concentration: Option<f64>,
    pub substitution_one_concentration: Option<f64>,
    pub substitution_two_concentration: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MicroscopeSettings {
    pub voltage: f64,
    pub aperture: f64,
    pub defocus: f64,
    pub dwell_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AberrationCoefficients {
    pub cs3_mean: f64,
    pub cs3_std: f64,
    pub cs5_mean: f64,
    pub cs5_std: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdfSettings {
    pub angle_min: f64,
    pub angle_max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaussianParameters {
    pub source_size_mean: f64,
    pub defocus_spread_mean: f64,
    pub probe_current_mean: f64,
    pub source_size_std: f64,
    pub defocus_spread_std: f64,
    pub probe_current_std: f64,
}

impl ParameterRecord {
    /// All defect concentrations present in the record, labelled by site.
    pub fn concentrations(&self) -> Vec<(&'static str, f64)> {
        let m = &self.metal_site_defects;
        let c = &self.chalcogen_site_defects;
        [
            ("metal substitution", m.substitution_concentration),
            ("metal vacancy", m.vacancy_concentration),
            ("chalcogen substitution", c.substitution_concentration),
            ("chalcogen vacancy (one)", c.vacancy_one_concentration),
            ("chalcogen vacancy (two)", c.vacancy_two_concentration),
            ("chalcogen substitution (one)", c.substitution_one_concentration),
            ("chalcogen substitution (two)", c.substitution_two_concentration),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.map(|v| (label, v)))
        .collect()
    }

    pub fn out_of_range_concentrations(&self) -> Vec<(&'static str, f64)> {
        self.concentrations()
            .into_iter()
            .filter(|(_, v)| !(0.0..=1.0).contains(v))
            .collect()
    }
}
