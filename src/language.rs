//! Static label tables for the supported page languages

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "nl")]
    Dutch,
    #[serde(rename = "es")]
    Spanish,
}

/// All UI strings of the page for one language
#[derive(Debug, PartialEq, Eq)]
pub struct Labels {
    pub title: &'static str,
    pub inventory: &'static str,
    pub add: &'static str,
    pub placeholder: &'static str,
    pub quantity: &'static str,
    pub order: &'static str,
    pub order_placeholder: &'static str,
    pub select_item: &'static str,
    pub loading: &'static str,
    pub already_exists: &'static str,
}

const ENGLISH: Labels = Labels {
    title: "Beverage Consumption Tracker",
    inventory: "Inventory",
    add: "Add",
    placeholder: "New item name",
    quantity: "Quantity",
    order: "Order",
    order_placeholder: "Quantity to order",
    select_item: "-- Select Item --",
    loading: "Loading...",
    already_exists: "Item already exists!",
};

const DUTCH: Labels = Labels {
    title: "Drankenverbruik Tracker",
    inventory: "Voorraad",
    add: "Toevoegen",
    placeholder: "Nieuwe item naam",
    quantity: "Aantal",
    order: "Bestellen",
    order_placeholder: "Aantal bestellen",
    select_item: "-- Selecteer item --",
    loading: "Laden...",
    already_exists: "Item bestaat al!",
};

const SPANISH: Labels = Labels {
    title: "Seguimiento de Consumo de Bebidas",
    inventory: "Inventario",
    add: "Agregar",
    placeholder: "Nombre del nuevo ítem",
    quantity: "Cantidad",
    order: "Pedir",
    order_placeholder: "Cantidad a pedir",
    select_item: "-- Seleccionar ítem --",
    loading: "Cargando...",
    already_exists: "¡El ítem ya existe!",
};

impl Language {
    /// Order of the entries in the language selector
    pub const ALL: [Language; 3] = [Language::English, Language::Dutch, Language::Spanish];

    /// Name shown in the language selector (in the language itself)
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Dutch => "Nederlands",
            Language::Spanish => "Español",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Dutch => "nl",
            Language::Spanish => "es",
        }
    }

    pub fn from_code(code: &str) -> Option<Language> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(code.trim()))
    }

    pub fn labels(&self) -> &'static Labels {
        match self {
            Language::English => &ENGLISH,
            Language::Dutch => &DUTCH,
            Language::Spanish => &SPANISH,
        }
    }
}
