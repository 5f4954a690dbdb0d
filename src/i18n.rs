//! UI strings per locale.  English is complete; other locales may leave keys
//! out and fall back to it.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    En,
    Ru,
    Uz,
}

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::En, Locale::Ru, Locale::Uz];

    pub const FALLBACK: Locale = Locale::En;

    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ru => "ru",
            Locale::Uz => "uz",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "ru" => Ok(Locale::Ru),
            "uz" => Ok(Locale::Uz),
            other => Err(format!("unknown locale '{other}' (expected en, ru or uz)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    AppTitle,
    FilterHeading,
    MaxBudget,
    MinYearBuilt,
    MinQuality,
    Bedrooms,
    GarageCars,
    MinLotArea,
    Any,
    FilteredHouses,
    MapView,
    AdminPanel,
    AveragePriceByNeighborhood,
    NewestListings,
    NewListing,
    Submit,
    ListingAdded,
    Estimate,
    EstimatedPrice,
    Retrain,
    NoResults,
    DatasetUnavailable,
    ModelUnavailable,
    ResultsCount,
    SalePrice,
    LivingArea,
    YearBuilt,
    LotArea,
    Neighborhood,
    ModelSamples,
    ExportedRows,
    ExportFailed,
}

impl MessageKey {
    pub const ALL: [MessageKey; 32] = [
        MessageKey::AppTitle,
        MessageKey::FilterHeading,
        MessageKey::MaxBudget,
        MessageKey::MinYearBuilt,
        MessageKey::MinQuality,
        MessageKey::Bedrooms,
        MessageKey::GarageCars,
        MessageKey::MinLotArea,
        MessageKey::Any,
        MessageKey::FilteredHouses,
        MessageKey::MapView,
        MessageKey::AdminPanel,
        MessageKey::AveragePriceByNeighborhood,
        MessageKey::NewestListings,
        MessageKey::NewListing,
        MessageKey::Submit,
        MessageKey::ListingAdded,
        MessageKey::Estimate,
        MessageKey::EstimatedPrice,
        MessageKey::Retrain,
        MessageKey::NoResults,
        MessageKey::DatasetUnavailable,
        MessageKey::ModelUnavailable,
        MessageKey::ResultsCount,
        MessageKey::SalePrice,
        MessageKey::LivingArea,
        MessageKey::YearBuilt,
        MessageKey::LotArea,
        MessageKey::Neighborhood,
        MessageKey::ModelSamples,
        MessageKey::ExportedRows,
        MessageKey::ExportFailed,
    ];
}

/// Look up a UI string, falling back to English.
pub fn tr(locale: Locale, key: MessageKey) -> &'static str {
    lookup(locale, key)
        .or_else(|| lookup(Locale::FALLBACK, key))
        .unwrap_or("?")
}

fn lookup(locale: Locale, key: MessageKey) -> Option<&'static str> {
    use MessageKey::*;
    match locale {
        Locale::En => Some(match key {
            AppTitle => "Ultimate House Finder",
            FilterHeading => "Filter Houses",
            MaxBudget => "Max Budget",
            MinYearBuilt => "Min Year Built",
            MinQuality => "Overall Qual",
            Bedrooms => "Bedrooms",
            GarageCars => "Garage Cars",
            MinLotArea => "Min Lot Area",
            Any => "Any",
            FilteredHouses => "Filtered Houses",
            MapView => "Map View",
            AdminPanel => "Admin Panel",
            AveragePriceByNeighborhood => "Average price by neighborhood",
            NewestListings => "Newest 5 Listings",
            NewListing => "Submit New House Listing",
            Submit => "Submit",
            ListingAdded => "Listing added!",
            Estimate => "Estimate Price",
            EstimatedPrice => "Estimated price",
            Retrain => "Retrain model",
            NoResults => "No houses match the current filters.",
            DatasetUnavailable => "Dataset unavailable",
            ModelUnavailable => "Price model unavailable",
            ResultsCount => "results",
            SalePrice => "Sale Price",
            LivingArea => "Gr Liv Area",
            YearBuilt => "Year Built",
            LotArea => "Lot Area",
            Neighborhood => "Neighborhood",
            ModelSamples => "Listings used by the model",
            ExportedRows => "Exported rows",
            ExportFailed => "Export failed",
        }),
        Locale::Ru => match key {
            AppTitle => Some("Поиск домов"),
            FilterHeading => Some("Фильтры"),
            MaxBudget => Some("Максимальный бюджет"),
            MinYearBuilt => Some("Год постройки от"),
            MinQuality => Some("Общее качество"),
            Bedrooms => Some("Спальни"),
            GarageCars => Some("Мест в гараже"),
            MinLotArea => Some("Площадь участка от"),
            Any => Some("Любое"),
            FilteredHouses => Some("Найденные дома"),
            MapView => Some("Карта"),
            AdminPanel => Some("Панель администратора"),
            AveragePriceByNeighborhood => Some("Средняя цена по районам"),
            NewestListings => Some("5 новейших объявлений"),
            NewListing => Some("Добавить объявление"),
            Submit => Some("Отправить"),
            ListingAdded => Some("Объявление добавлено!"),
            Estimate => Some("Оценить цену"),
            EstimatedPrice => Some("Оценочная цена"),
            NoResults => Some("Нет домов, подходящих под фильтры."),
            DatasetUnavailable => Some("Данные недоступны"),
            ModelUnavailable => Some("Модель недоступна"),
            ResultsCount => Some("результатов"),
            Retrain => Some("Переобучить модель"),
            SalePrice => Some("Цена продажи"),
            LivingArea => Some("Жилая площадь"),
            YearBuilt => Some("Год постройки"),
            LotArea => Some("Площадь участка"),
            Neighborhood => Some("Район"),
            ModelSamples => Some("Объявлений в модели"),
            ExportedRows => Some("Экспортировано строк"),
            ExportFailed => Some("Ошибка экспорта"),
        },
        Locale::Uz => match key {
            AppTitle => Some("Uy qidiruvchi"),
            FilterHeading => Some("Filtrlar"),
            MaxBudget => Some("Maksimal byudjet"),
            MinYearBuilt => Some("Qurilgan yil (dan)"),
            Bedrooms => Some("Yotoqxonalar"),
            Any => Some("Istalgan"),
            MapView => Some("Xarita"),
            Submit => Some("Yuborish"),
            Estimate => Some("Narxni baholash"),
            NoResults => Some("Mos uylar topilmadi."),
            SalePrice => Some("Sotuv narxi"),
            LivingArea => Some("Yashash maydoni"),
            YearBuilt => Some("Qurilgan yil"),
            LotArea => Some("Yer maydoni"),
            Neighborhood => Some("Mahalla"),
            ModelSamples => Some("Modeldagi e'lonlar"),
            ExportedRows => Some("Eksport qilingan qatorlar"),
            ExportFailed => Some("Eksport xatosi"),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_translation_falls_back_to_english() {
        assert_eq!(tr(Locale::Uz, MessageKey::AdminPanel), "Admin Panel");
        assert_eq!(tr(Locale::Ru, MessageKey::MapView), "Карта");
    }

    #[test]
    fn english_and_russian_cover_every_key() {
        for key in MessageKey::ALL {
            assert!(lookup(Locale::En, key).is_some(), "{key:?}");
            assert!(lookup(Locale::Ru, key).is_some(), "{key:?}");
        }
    }

    #[test]
    fn form_and_export_labels_are_translated() {
        for key in [
            MessageKey::SalePrice,
            MessageKey::LivingArea,
            MessageKey::ModelSamples,
            MessageKey::ExportedRows,
            MessageKey::ExportFailed,
        ] {
            assert_ne!(tr(Locale::Uz, key), tr(Locale::En, key), "{key:?}");
            assert_ne!(tr(Locale::Ru, key), tr(Locale::En, key), "{key:?}");
        }
    }

    #[test]
    fn locale_codes_parse() {
        for locale in Locale::ALL {
            assert_eq!(locale.code().parse::<Locale>(), Ok(locale));
        }
        assert_eq!("EN".parse::<Locale>(), Ok(Locale::En));
        assert!("fr".parse::<Locale>().is_err());
    }
}
