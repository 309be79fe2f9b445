//! Static localization tables for the sample review report.
//!
//! Every fixed string that ends up on the page or in a user-facing message is
//! addressed through [`Label`].  The English text is the canonical source; the
//! curated Mandarin text backs the built-in glossary used by
//! [`crate::translate::Glossary`].  Sample types and assessment locations carry
//! their own bilingual tables.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Output language for the generated document or for user-facing messages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English, the source language of every label.
    #[default]
    #[serde(alias = "en")]
    English,
    /// Simplified Chinese.
    #[serde(alias = "zh", alias = "chinese")]
    Mandarin,
}

impl Language {
    /// Short language code handed to the translation backend.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Mandarin => "zh",
        }
    }

    /// Human readable name of the language.
    pub fn display_name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Mandarin => "Mandarin",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Error returned when a language name cannot be parsed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown language `{0}`; expected `en`/`english` or `zh`/`mandarin`")]
pub struct UnknownLanguage(String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "zh" | "mandarin" | "chinese" => Ok(Language::Mandarin),
            _ => Err(UnknownLanguage(value.to_owned())),
        }
    }
}

/// Keys of every fixed string used by the report and the command line front end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Label {
    Title,
    Header,
    TechnicalReview,
    SampleId,
    StyleNo,
    Size,
    Factory,
    Purpose,
    Brand,
    LastNo,
    Sales,
    NewOld,
    OutsoleNo,
    ReviewDate,
    CheckItems,
    First,
    Second,
    Third,
    Fourth,
    Conclusion,
    Disclaimer,
    TechnicalRepresentative,
    FactoryRepresentative,
    After,
    Before,
    Location,
    MeasurementData,
    QualityAssessment,
    SignatureSection,
    ReviewedBy,
    ApprovedBy,
    Date,
    Generated,
    PageNumber,
    ReviewCompleted,
    SamplePhoto,
    GenerateSuccess,
    FillRequired,
    ErrorGenerating,
}

impl Label {
    /// Every label, in table order.
    pub const ALL: [Label; 39] = [
        Label::Title,
        Label::Header,
        Label::TechnicalReview,
        Label::SampleId,
        Label::StyleNo,
        Label::Size,
        Label::Factory,
        Label::Purpose,
        Label::Brand,
        Label::LastNo,
        Label::Sales,
        Label::NewOld,
        Label::OutsoleNo,
        Label::ReviewDate,
        Label::CheckItems,
        Label::First,
        Label::Second,
        Label::Third,
        Label::Fourth,
        Label::Conclusion,
        Label::Disclaimer,
        Label::TechnicalRepresentative,
        Label::FactoryRepresentative,
        Label::After,
        Label::Before,
        Label::Location,
        Label::MeasurementData,
        Label::QualityAssessment,
        Label::SignatureSection,
        Label::ReviewedBy,
        Label::ApprovedBy,
        Label::Date,
        Label::Generated,
        Label::PageNumber,
        Label::ReviewCompleted,
        Label::SamplePhoto,
        Label::GenerateSuccess,
        Label::FillRequired,
        Label::ErrorGenerating,
    ];

    /// Stable lookup key of the label.
    pub fn key(self) -> &'static str {
        match self {
            Label::Title => "title",
            Label::Header => "header",
            Label::TechnicalReview => "technical_review",
            Label::SampleId => "sample_id",
            Label::StyleNo => "style_no",
            Label::Size => "size",
            Label::Factory => "factory",
            Label::Purpose => "purpose",
            Label::Brand => "brand",
            Label::LastNo => "last_no",
            Label::Sales => "sales",
            Label::NewOld => "new_old",
            Label::OutsoleNo => "outsole_no",
            Label::ReviewDate => "review_date",
            Label::CheckItems => "check_items",
            Label::First => "first",
            Label::Second => "second",
            Label::Third => "third",
            Label::Fourth => "fourth",
            Label::Conclusion => "conclusion",
            Label::Disclaimer => "disclaimer",
            Label::TechnicalRepresentative => "technical_representative",
            Label::FactoryRepresentative => "factory_representative",
            Label::After => "after",
            Label::Before => "before",
            Label::Location => "location",
            Label::MeasurementData => "measurement_data",
            Label::QualityAssessment => "quality_assessment",
            Label::SignatureSection => "signature_section",
            Label::ReviewedBy => "reviewed_by",
            Label::ApprovedBy => "approved_by",
            Label::Date => "date",
            Label::Generated => "generated",
            Label::PageNumber => "page_number",
            Label::ReviewCompleted => "review_completed",
            Label::SamplePhoto => "sample_photo",
            Label::GenerateSuccess => "generate_success",
            Label::FillRequired => "fill_required",
            Label::ErrorGenerating => "error_generating",
        }
    }

    /// Looks a label up by its key.
    pub fn from_key(key: &str) -> Option<Label> {
        Label::ALL.into_iter().find(|label| label.key() == key)
    }

    /// Canonical English text.
    pub fn english(self) -> &'static str {
        match self {
            Label::Title => "Factory Sample Review Report",
            Label::Header => "FACTORY SAMPLE REVIEW REPORT",
            Label::TechnicalReview => "Technical Review",
            Label::SampleId => "Sample ID",
            Label::StyleNo => "Style No.",
            Label::Size => "Size",
            Label::Factory => "Factory",
            Label::Purpose => "Purpose",
            Label::Brand => "Brand",
            Label::LastNo => "Last No.",
            Label::Sales => "Sales",
            Label::NewOld => "New/Old",
            Label::OutsoleNo => "Outsole NO.",
            Label::ReviewDate => "Review Date",
            Label::CheckItems => "Check Items",
            Label::First => "First",
            Label::Second => "Second",
            Label::Third => "Third",
            Label::Fourth => "Fourth",
            Label::Conclusion => "Conclusion",
            Label::Disclaimer => {
                "Note: This review information does not release the factory from any \
                 responsibilities in the event of claims being received from our customer."
            }
            Label::TechnicalRepresentative => "GrandStep Tech",
            Label::FactoryRepresentative => "Factory Representative",
            Label::After => "After",
            Label::Before => "Before",
            Label::Location => "Location",
            Label::MeasurementData => "Measurement Data",
            Label::QualityAssessment => "Quality Assessment",
            Label::SignatureSection => "Authorization & Signatures",
            Label::ReviewedBy => "Reviewed By",
            Label::ApprovedBy => "Approved By",
            Label::Date => "Date",
            Label::Generated => "Generated",
            Label::PageNumber => "Page {page}",
            Label::ReviewCompleted => "Review Completed",
            Label::SamplePhoto => "Sample Photo",
            Label::GenerateSuccess => "PDF Generated Successfully!",
            Label::FillRequired => "Please fill in at least Style No. and Factory!",
            Label::ErrorGenerating => "Error generating PDF",
        }
    }

    /// Curated Simplified Chinese text.
    pub fn mandarin(self) -> &'static str {
        match self {
            Label::Title => "样品技术核查表",
            Label::Header => "样品技术核查报告",
            Label::TechnicalReview => "技术审核",
            Label::SampleId => "样品编号",
            Label::StyleNo => "型体",
            Label::Size => "码数",
            Label::Factory => "工厂",
            Label::Purpose => "类型",
            Label::Brand => "品牌",
            Label::LastNo => "楦号",
            Label::Sales => "业务",
            Label::NewOld => "新旧",
            Label::OutsoleNo => "大底",
            Label::ReviewDate => "审核日期",
            Label::CheckItems => "核查项目",
            Label::First => "第一次",
            Label::Second => "第二次",
            Label::Third => "第三次",
            Label::Fourth => "第四次",
            Label::Conclusion => "结论",
            Label::Disclaimer => {
                "以上不免除我客人收到货后索赔而引起的货物供应商(工厂)的任何责任."
            }
            Label::TechnicalRepresentative => "GrandStep技术代表",
            Label::FactoryRepresentative => "工厂代表",
            Label::After => "后置",
            Label::Before => "前置",
            Label::Location => "地点",
            Label::MeasurementData => "测量数据",
            Label::QualityAssessment => "质量评估",
            Label::SignatureSection => "授权与签名",
            Label::ReviewedBy => "审核人",
            Label::ApprovedBy => "批准人",
            Label::Date => "日期",
            Label::Generated => "生成",
            Label::PageNumber => "第 {page} 页",
            Label::ReviewCompleted => "审核完成",
            Label::SamplePhoto => "样品照片",
            Label::GenerateSuccess => "PDF 报告生成成功!",
            Label::FillRequired => "请至少填写型体和工厂!",
            Label::ErrorGenerating => "生成 PDF 出错",
        }
    }

    /// Text from the static table for `language`.
    pub fn text(self, language: Language) -> &'static str {
        match language {
            Language::English => self.english(),
            Language::Mandarin => self.mandarin(),
        }
    }
}

/// Purpose of the reviewed sample.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
pub enum SampleType {
    #[default]
    #[serde(rename = "Dev.sample", alias = "dev")]
    Development,
    #[serde(rename = "Cfm sample", alias = "cfm")]
    Confirmation,
    #[serde(rename = "Fit sample", alias = "fit")]
    Fitting,
    #[serde(rename = "Size set", alias = "size-set")]
    SizeSet,
    #[serde(rename = "TOP sample", alias = "top")]
    Production,
    #[serde(rename = "Shipment sample", alias = "shipment")]
    Shipment,
}

impl SampleType {
    pub const ALL: [SampleType; 6] = [
        SampleType::Development,
        SampleType::Confirmation,
        SampleType::Fitting,
        SampleType::SizeSet,
        SampleType::Production,
        SampleType::Shipment,
    ];

    /// Short code used on factory paperwork and in form files.
    pub fn code(self) -> &'static str {
        match self {
            SampleType::Development => "Dev.sample",
            SampleType::Confirmation => "Cfm sample",
            SampleType::Fitting => "Fit sample",
            SampleType::SizeSet => "Size set",
            SampleType::Production => "TOP sample",
            SampleType::Shipment => "Shipment sample",
        }
    }

    pub fn english(self) -> &'static str {
        match self {
            SampleType::Development => "Development Sample",
            SampleType::Confirmation => "Confirmation Sample",
            SampleType::Fitting => "Fitting Sample",
            SampleType::SizeSet => "Size Set Sample",
            SampleType::Production => "Production Sample",
            SampleType::Shipment => "Shipment Sample",
        }
    }

    pub fn mandarin(self) -> &'static str {
        match self {
            SampleType::Development => "开发样",
            SampleType::Confirmation => "确认样",
            SampleType::Fitting => "试穿样",
            SampleType::SizeSet => "尺码套样",
            SampleType::Production => "大货样",
            SampleType::Shipment => "船样",
        }
    }
}

/// Whether the sample is a new design, a carry-over or a revision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
pub enum NewOld {
    #[default]
    New,
    Old,
    Revised,
}

impl NewOld {
    pub fn as_str(self) -> &'static str {
        match self {
            NewOld::New => "New",
            NewOld::Old => "Old",
            NewOld::Revised => "Revised",
        }
    }
}

/// Assessment location printed in the footer and embedded in the file name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct City {
    name: &'static str,
    chinese: &'static str,
}

/// Cities offered as assessment locations.
pub const CITIES: &[City] = &[
    City::new("Guangzhou", "广东"),
    City::new("Shenzhen", "深圳"),
    City::new("Dongguan", "东莞"),
    City::new("Foshan", "佛山"),
    City::new("Zhongshan", "中山"),
    City::new("Huizhou", "惠州"),
    City::new("Zhuhai", "珠海"),
    City::new("Jiangmen", "江门"),
    City::new("Zhaoqing", "肇庆"),
    City::new("Shanghai", "上海"),
    City::new("Beijing", "北京"),
    City::new("Suzhou", "苏州"),
    City::new("Hangzhou", "杭州"),
    City::new("Ningbo", "宁波"),
    City::new("Wenzhou", "温州"),
    City::new("Wuhan", "武汉"),
    City::new("Chengdu", "成都"),
    City::new("Chongqing", "重庆"),
    City::new("Tianjin", "天津"),
    City::new("Nanjing", "南京"),
    City::new("Xi'an", "西安"),
    City::new("Qingdao", "青岛"),
    City::new("Dalian", "大连"),
    City::new("Shenyang", "沈阳"),
    City::new("Changsha", "长沙"),
    City::new("Zhengzhou", "郑州"),
    City::new("Jinan", "济南"),
    City::new("Harbin", "哈尔滨"),
    City::new("Changchun", "长春"),
    City::new("Taiyuan", "太原"),
    City::new("Shijiazhuang", "石家庄"),
    City::new("Lanzhou", "兰州"),
    City::new("Xiamen", "厦门"),
    City::new("Fuzhou", "福州"),
    City::new("Nanning", "南宁"),
    City::new("Kunming", "昆明"),
    City::new("Guiyang", "贵阳"),
    City::new("Haikou", "海口"),
    City::new("Ürümqi", "乌鲁木齐"),
    City::new("Lhasa", "拉萨"),
];

impl City {
    const fn new(name: &'static str, chinese: &'static str) -> Self {
        Self { name, chinese }
    }

    /// Finds a city by its English or Chinese name, ignoring ASCII case.
    pub fn find(name: &str) -> Option<City> {
        let name = name.trim();
        CITIES
            .iter()
            .copied()
            .find(|city| city.name.eq_ignore_ascii_case(name) || city.chinese == name)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn chinese(&self) -> &'static str {
        self.chinese
    }
}

impl Default for City {
    fn default() -> Self {
        City::new("Shanghai", "上海")
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.chinese)
    }
}

/// Error returned when a city is not part of [`CITIES`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown assessment location `{0}`")]
pub struct UnknownCity(String);

impl FromStr for City {
    type Err = UnknownCity;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        City::find(value).ok_or_else(|| UnknownCity(value.to_owned()))
    }
}

impl<'de> Deserialize<'de> for City {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn keys_round_trip_through_lookup() {
        for label in Label::ALL {
            assert_eq!(Label::from_key(label.key()), Some(label));
        }
        assert_eq!(Label::from_key("no_such_key"), None);
    }

    #[test]
    fn keys_are_unique() {
        let keys: HashSet<_> = Label::ALL.iter().map(|label| label.key()).collect();
        assert_eq!(keys.len(), Label::ALL.len());
    }

    #[test]
    fn page_number_templates_keep_placeholder() {
        for language in [Language::English, Language::Mandarin] {
            assert!(Label::PageNumber.text(language).contains("{page}"));
        }
    }

    #[test]
    fn parses_language_names() {
        assert_eq!("EN".parse::<Language>(), Ok(Language::English));
        assert_eq!("mandarin".parse::<Language>(), Ok(Language::Mandarin));
        assert_eq!("zh".parse::<Language>(), Ok(Language::Mandarin));
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn finds_cities_by_either_name() {
        assert_eq!(City::find("shenzhen").map(|c| c.chinese()), Some("深圳"));
        assert_eq!(City::find("上海").map(|c| c.name()), Some("Shanghai"));
        assert_eq!(City::find("Atlantis"), None);
        assert_eq!(City::default().name(), "Shanghai");
    }

    #[test]
    fn sample_type_codes_are_distinct() {
        let codes: HashSet<_> = SampleType::ALL.iter().map(|t| t.code()).collect();
        assert_eq!(codes.len(), SampleType::ALL.len());
    }
}
