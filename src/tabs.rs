use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::panels::PanelId;

pub const BUTTON_CLASS: &str = "param-btn";
pub const ACTIVE_BUTTON_CLASS: &str = "param-btn active-param-btn";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    Material,
    Microscope,
}

impl Tab {
    pub fn button_id(self) -> &'static str {
        match self {
            Tab::Material => "btn-material",
            Tab::Microscope => "btn-microscope",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::Material => "Material",
            Tab::Microscope => "Microscope",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TabEvent {
    ClickMaterial,
    ClickMicroscope,
}

impl TabEvent {
    pub fn target(self) -> Tab {
        match self {
            TabEvent::ClickMaterial => Tab::Material,
            TabEvent::ClickMicroscope => Tab::Microscope,
        }
    }
}

impl From<Tab> for TabEvent {
    fn from(tab: Tab) -> Self {
        match tab {
            Tab::Material => TabEvent::ClickMaterial,
            Tab::Microscope => TabEvent::ClickMicroscope,
        }
    }
}

/// What the page shows for a given tab: button classes and panel display values.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TabView {
    pub active: Tab,
    pub material_class: &'static str,
    pub microscope_class: &'static str,
    pub panels: BTreeMap<&'static str, &'static str>,
}

impl TabView {
    pub fn for_tab(active: Tab) -> Self {
        let class = |tab: Tab| {
            if tab == active {
                ACTIVE_BUTTON_CLASS
            } else {
                BUTTON_CLASS
            }
        };
        let panels = PanelId::ALL
            .iter()
            .map(|p| {
                let display = if p.tab() == active { "block" } else { "none" };
                (p.dom_id(), display)
            })
            .collect();
        TabView {
            active,
            material_class: class(Tab::Material),
            microscope_class: class(Tab::Microscope),
            panels,
        }
    }

    pub fn is_visible(&self, panel: PanelId) -> bool {
        self.panels.get(panel.dom_id()) == Some(&"block")
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TabController {
    active: Tab,
}

impl TabController {
    pub fn active(&self) -> Tab {
        self.active
    }

    pub fn handle(&mut self, event: TabEvent) -> TabView {
        self.active = event.target();
        self.view()
    }

    pub fn view(&self) -> TabView {
        TabView::for_tab(self.active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_consistent(view: &TabView) {
        for p in PanelId::ALL {
            assert_eq!(view.is_visible(p), p.tab() == view.active, "{:?}", p);
        }
        let active_buttons = [view.material_class, view.microscope_class]
            .iter()
            .filter(|c| **c == ACTIVE_BUTTON_CLASS)
            .count();
        assert_eq!(active_buttons, 1);
    }

    #[test]
    fn test_default_is_material() {
        let tabs = TabController::default();
        assert_eq!(tabs.active(), Tab::Material);
        let mut clicked = TabController::default();
        assert_eq!(tabs.view(), clicked.handle(TabEvent::ClickMaterial));
        assert_eq!(tabs.view().material_class, ACTIVE_BUTTON_CLASS);
        assert!(tabs.view().is_visible(PanelId::ChalcogenDefects));
        assert!(!tabs.view().is_visible(PanelId::Gaussian));
    }

    #[test]
    fn test_microscope_swaps_panels() {
        let mut tabs = TabController::default();
        let view = tabs.handle(TabEvent::ClickMicroscope);
        assert_eq!(view.active, Tab::Microscope);
        assert_eq!(view.microscope_class, ACTIVE_BUTTON_CLASS);
        assert_eq!(view.material_class, BUTTON_CLASS);
        for p in [PanelId::Microscope, PanelId::Aberration, PanelId::Adf, PanelId::Gaussian] {
            assert!(view.is_visible(p));
        }
        for p in [PanelId::Material, PanelId::MetalDefects, PanelId::ChalcogenDefects] {
            assert!(!view.is_visible(p));
        }
    }

    #[test]
    fn test_click_sequences_keep_one_tab_active() {
        let events = [
            TabEvent::ClickMicroscope,
            TabEvent::ClickMicroscope,
            TabEvent::ClickMaterial,
            TabEvent::ClickMicroscope,
            TabEvent::ClickMaterial,
            TabEvent::ClickMaterial,
        ];
        let mut tabs = TabController::default();
        assert_consistent(&tabs.view());
        for event in events {
            let view = tabs.handle(event);
            assert_eq!(view.active, event.target());
            assert_consistent(&view);
        }
    }

    #[test]
    fn test_view_serializes_display_values() {
        let json = serde_json::to_value(TabView::for_tab(Tab::Microscope)).unwrap();
        assert_eq!(json["active"], "microscope");
        assert_eq!(json["panels"]["material-panel"], "none");
        assert_eq!(json["panels"]["adf-panel"], "block");
    }
}
