use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fr,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Fr];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(code.trim()))
    }

    pub fn strings(self) -> &'static Strings {
        match self {
            Language::En => &EN,
            Language::Fr => &FR,
        }
    }
}

#[derive(Debug)]
pub struct Strings {
    pub start_placeholder: &'static str,
    pub end_placeholder: &'static str,
    pub via_placeholder: &'static str,
    pub outside_map_bounds: &'static str,
    pub reachable: &'static str,
    pub unreachable: &'static str,
    pub waiting: &'static str,
}

const EN: Strings = Strings {
    start_placeholder: "Start - press enter to drop marker",
    end_placeholder: "End - press enter to drop marker",
    via_placeholder: "Via point - press enter to drop marker",
    outside_map_bounds: "You seem located outside the boundaries of the map",
    reachable: "Destination reachable",
    unreachable: "Destination unreachable with this battery",
    waiting: "Drag the start or end marker to plan charging stops.",
};

const FR: Strings = Strings {
    start_placeholder: "Départ - appuyez sur Entrée pour placer le marqueur",
    end_placeholder: "Arrivée - appuyez sur Entrée pour placer le marqueur",
    via_placeholder: "Étape - appuyez sur Entrée pour placer le marqueur",
    outside_map_bounds: "Vous semblez être hors des limites de la carte",
    reachable: "Destination atteignable",
    unreachable: "Destination hors d'atteinte avec cette batterie",
    waiting: "Déplacez le marqueur de départ ou d'arrivée pour calculer les recharges.",
};

impl Strings {
    /// Geocoder input hint for the waypoint at `index` out of `count`.
    pub fn geocoder_placeholder(&self, index: usize, count: usize) -> &'static str {
        if index == 0 {
            self.start_placeholder
        } else if index + 1 == count {
            self.end_placeholder
        } else {
            self.via_placeholder
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_follow_position() {
        let strings = Language::En.strings();
        assert_eq!(strings.geocoder_placeholder(0, 3), strings.start_placeholder);
        assert_eq!(strings.geocoder_placeholder(1, 3), strings.via_placeholder);
        assert_eq!(strings.geocoder_placeholder(2, 3), strings.end_placeholder);
    }

    #[test]
    fn language_codes_are_case_insensitive() {
        assert_eq!(Language::from_code("FR"), Some(Language::Fr));
        assert_eq!(Language::from_code("de"), None);
    }
}
