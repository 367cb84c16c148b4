use serde::Serialize;
use std::fmt::Write;

use crate::tabs::Tab;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelId {
    Material,
    MetalDefects,
    ChalcogenDefects,
    Microscope,
    Aberration,
    Adf,
    Gaussian,
}

impl PanelId {
    pub const ALL: [PanelId; 7] = [
        PanelId::Material,
        PanelId::MetalDefects,
        PanelId::ChalcogenDefects,
        PanelId::Microscope,
        PanelId::Aberration,
        PanelId::Adf,
        PanelId::Gaussian,
    ];

    pub fn dom_id(self) -> &'static str {
        match self {
            PanelId::Material => "material-panel",
            PanelId::MetalDefects => "metal-defects-panel",
            PanelId::ChalcogenDefects => "chalcogen-panel",
            PanelId::Microscope => "microscope-panel",
            PanelId::Aberration => "aberration-panel",
            PanelId::Adf => "adf-panel",
            PanelId::Gaussian => "gaussian-panel",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            PanelId::Material => "Material Properties",
            PanelId::MetalDefects => "Metal Site Defects",
            PanelId::ChalcogenDefects => "Chalcogen Site Defects",
            PanelId::Microscope => "Microscope Settings",
            PanelId::Aberration => "Aberration Coefficients",
            PanelId::Adf => "ADF Detector Settings",
            PanelId::Gaussian => "Gaussian Parameters",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            PanelId::Material => "Host lattice and image geometry",
            PanelId::MetalDefects => {
                "Substitutions and vacancies on metal sites, concentrations from 0 to 1.0"
            }
            PanelId::ChalcogenDefects => {
                "Substitutions and vacancies on chalcogen sites, concentrations from 0 to 1.0"
            }
            PanelId::Microscope => "Beam energy, probe-forming aperture and scan",
            PanelId::Aberration => "Spherical aberration sampled per image",
            PanelId::Adf => "Annular detector collection angles",
            PanelId::Gaussian => "Source size, defocus spread and probe current",
        }
    }

    pub fn tab(self) -> Tab {
        match self {
            PanelId::Material | PanelId::MetalDefects | PanelId::ChalcogenDefects => Tab::Material,
            PanelId::Microscope | PanelId::Aberration | PanelId::Adf | PanelId::Gaussian => {
                Tab::Microscope
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number,
}

#[derive(Clone, Debug, Serialize)]
pub struct FieldSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub panel: PanelId,
    pub kind: FieldKind,
    pub default: &'static str,
    pub required: bool,
    /// Browser hint only; nothing server-side enforces it.
    pub range: Option<(f64, f64)>,
}

const fn required(id: &'static str, label: &'static str, panel: PanelId) -> FieldSpec {
    FieldSpec {
        id,
        label,
        panel,
        kind: FieldKind::Number,
        default: "0",
        required: true,
        range: None,
    }
}

const fn optional(id: &'static str, label: &'static str, panel: PanelId) -> FieldSpec {
    FieldSpec {
        id,
        label,
        panel,
        kind: FieldKind::Number,
        default: "0",
        required: false,
        range: None,
    }
}

const fn concentration(id: &'static str, label: &'static str, panel: PanelId) -> FieldSpec {
    FieldSpec {
        id,
        label,
        panel,
        kind: FieldKind::Number,
        default: "0",
        required: false,
        range: Some((0.0, 1.0)),
    }
}

pub const BATCH_SIZE_ID: &str = "batch-size-dropdown";
pub const BATCH_SIZES: [u32; 6] = [1, 5, 10, 25, 50, 100];
pub const DEFAULT_BATCH_SIZE: u32 = 10;

pub static FIELDS: &[FieldSpec] = &[
    FieldSpec {
        id: "mat-name",
        label: "Material Name",
        panel: PanelId::Material,
        kind: FieldKind::Text,
        default: "MoS2",
        required: true,
        range: None,
    },
    required("pixel-size", "Pixel Size (Å)", PanelId::Material),
    required("metal-atom", "Metal Atom Number (Z)", PanelId::Material),
    required("lattice-const", "Lattice Constant (Å)", PanelId::Material),
    required("img-size", "Image Size (px)", PanelId::Material),
    required("chal-atom", "Chalcogen Atom Number (Z)", PanelId::Material),
    optional("sub-atom-metal", "Substitution Atom Number (Z)", PanelId::MetalDefects),
    concentration("metal-sub-conc", "Substitution Concentration", PanelId::MetalDefects),
    concentration("metal-vac-conc", "Vacancy Concentration", PanelId::MetalDefects),
    optional("sub-atom-chal", "Substitution Atom Number (Z)", PanelId::ChalcogenDefects),
    concentration("chal-sub-conc", "Substitution Concentration", PanelId::ChalcogenDefects),
    concentration("vac-one-conc", "Vacancy One Concentration", PanelId::ChalcogenDefects),
    concentration("vac-two-conc", "Vacancy Two Concentration", PanelId::ChalcogenDefects),
    concentration("sub-one-conc", "Substitution One Concentration", PanelId::ChalcogenDefects),
    concentration("sub-two-conc", "Substitution Two Concentration", PanelId::ChalcogenDefects),
    required("voltage", "Voltage (kV)", PanelId::Microscope),
    required("aperture", "Aperture (mrad)", PanelId::Microscope),
    required("defocus", "Defocus (Å)", PanelId::Microscope),
    required("dwell-time", "Dwell Time (µs)", PanelId::Microscope),
    required("cs3-mean", "Cs3 Mean (mm)", PanelId::Aberration),
    required("cs3-std", "Cs3 Std (mm)", PanelId::Aberration),
    required("cs5-mean", "Cs5 Mean (mm)", PanelId::Aberration),
    required("cs5-std", "Cs5 Std (mm)", PanelId::Aberration),
    required("adf-angle-min", "Inner Angle (mrad)", PanelId::Adf),
    required("adf-angle-max", "Outer Angle (mrad)", PanelId::Adf),
    required("src-size-mean", "Source Size Mean (nm)", PanelId::Gaussian),
    required("defoc-spread-mean", "Defocus Spread Mean (Å)", PanelId::Gaussian),
    required("probe-cur-mean", "Probe Current Mean (A)", PanelId::Gaussian),
    required("src-size-std", "Source Size Std (nm)", PanelId::Gaussian),
    required("defoc-spread-std", "Defocus Spread Std (Å)", PanelId::Gaussian),
    required("probe-cur-std", "Probe Current Std (A)", PanelId::Gaussian),
];

pub fn field(id: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|f| f.id == id)
}

pub fn fields_in(panel: PanelId) -> impl Iterator<Item = &'static FieldSpec> {
    FIELDS.iter().filter(move |f| f.panel == panel)
}

fn render_input(out: &mut String, f: &FieldSpec) {
    let _ = write!(out, "<label for=\"{}\">{}</label>", f.id, f.label);
    match f.kind {
        FieldKind::Text => {
            let _ = write!(
                out,
                "<input id=\"{}\" name=\"{}\" type=\"text\" value=\"{}\" class=\"input-field\" />",
                f.id, f.id, f.default
            );
        }
        FieldKind::Number => {
            let hint = match f.range {
                Some((lo, hi)) => format!(" min=\"{lo}\" max=\"{hi}\" step=\"0.01\""),
                None => " step=\"any\"".to_string(),
            };
            let _ = write!(
                out,
                "<input id=\"{}\" name=\"{}\" type=\"number\"{} value=\"{}\" class=\"input-field\" />",
                f.id, f.id, hint, f.default
            );
        }
    }
}

/// One panel as a form fragment, fields split over two columns.
pub fn render_panel(panel: PanelId, visible: bool) -> String {
    let fields: Vec<&FieldSpec> = fields_in(panel).collect();
    let split = (fields.len() + 1) / 2;
    let display = if visible { "block" } else { "none" };

    let mut out = String::new();
    let _ = write!(
        out,
        "<div id=\"{}\" class=\"panel\" style=\"display: {display};\">",
        panel.dom_id()
    );
    let _ = write!(
        out,
        "<h4 class=\"section-title\">{}</h4><p class=\"section-subtitle\">{}</p>",
        panel.title(),
        panel.subtitle()
    );
    out.push_str("<div class=\"form-grid\">");
    for column in fields.chunks(split.max(1)) {
        out.push_str("<div class=\"form-col\">");
        for f in column {
            render_input(&mut out, f);
        }
        out.push_str("</div>");
    }
    out.push_str("</div></div>");
    out
}

pub fn render_batch_selector() -> String {
    let mut out = format!("<select id=\"{BATCH_SIZE_ID}\" name=\"{BATCH_SIZE_ID}\">");
    for size in BATCH_SIZES {
        let selected = if size == DEFAULT_BATCH_SIZE { " selected" } else { "" };
        let _ = write!(out, "<option value=\"{size}\"{selected}>{size}</option>");
    }
    out.push_str("</select>");
    out
}
