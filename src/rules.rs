//! The marker rule table.
//!
//! A [`Rule`] pairs a literal document fragment with the localization
//! key that should be attached to it and the replacement text carrying
//! the injected `data-i18n` attribute. Rules are kept in an ordered,
//! validated [`RuleSet`]; the built-in set reproduces the fragment list
//! of the Bulgarian landing page the tool was written for, and an
//! external TOML file with the same shape can be loaded instead.
//!
//! Validation happens eagerly, when the set is built: a duplicate key
//! or a structurally empty rule is rejected before any document is
//! touched.

use std::collections::HashSet;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fileio;

/// One marker rule.
///
/// `pattern` is literal text from the document (it may span lines; any
/// whitespace run in it matches any whitespace run in the document,
/// see [`crate::injector`]). `key` is the dotted localization
/// identifier, unique across the set. `template` is the replacement:
/// the matched content with `data-i18n="<key>"` injected, substituted
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub pattern: String,
    pub key: String,
    pub template: String,
}

/// An ordered, validated list of rules.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Builds a rule set, validating every rule.
    ///
    /// # Returns
    ///
    /// * `Err(Error::DuplicateKey)` if two rules share a key.
    /// * `Err(Error::InvalidRule)` if a rule has an empty key or an
    ///   empty pattern (an empty pattern would match everywhere).
    pub fn new(rules: Vec<Rule>) -> Result<Self> {
        let mut seen = HashSet::new();
        for rule in &rules {
            if rule.key.is_empty() {
                return Err(Error::InvalidRule {
                    key: rule.key.clone(),
                    message: "empty localization key".to_string(),
                });
            }
            if rule.pattern.trim().is_empty() {
                return Err(Error::InvalidRule {
                    key: rule.key.clone(),
                    message: "empty pattern".to_string(),
                });
            }
            if !seen.insert(rule.key.as_str()) {
                return Err(Error::DuplicateKey(rule.key.clone()));
            }
        }
        Ok(Self { rules })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Shape of an external rule file: a sequence of `[[rule]]` tables.
#[derive(Debug, Deserialize)]
struct RuleFileDoc {
    #[serde(rename = "rule")]
    rules: Vec<Rule>,
}

/// Loads a rule set from a TOML file.
///
/// The file consists of `[[rule]]` tables, each with `pattern`, `key`
/// and `template` string entries, in application order:
///
/// ```toml
/// [[rule]]
/// pattern = "<h4>Кариери</h4>"
/// key = "footer.careers"
/// template = '<h4 data-i18n="footer.careers">Кариери</h4>'
/// ```
///
/// # Returns
///
/// * `Err(Error::FileAccess)` if the file cannot be read.
/// * `Err(Error::RuleFile)` if it is not valid TOML of this shape.
/// * Any [`RuleSet::new`] validation error.
pub fn load_rule_file<P: AsRef<Path>>(path: P) -> Result<RuleSet> {
    let path = path.as_ref();
    let text = fileio::read_document(path)?;
    let doc: RuleFileDoc = toml::from_str(&text).map_err(|err| Error::RuleFile {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    RuleSet::new(doc.rules)
}

/// Returns the built-in rule table.
pub fn builtin_rules() -> &'static RuleSet {
    &BUILTIN_RULES
}

static BUILTIN_RULES: Lazy<RuleSet> = Lazy::new(|| {
    let rules = BUILTIN
        .iter()
        .map(|&(key, pattern, template)| Rule {
            pattern: pattern.to_string(),
            key: key.to_string(),
            template: template.to_string(),
        })
        .collect();
    RuleSet::new(rules).expect("built-in rule table failed validation")
});

/// The built-in table: (key, pattern, template), in application order.
///
/// Keys follow the translation table of the landing page
/// (`nav.*`, `hero.*`, `techSolutions.*`, `products.*`, `contact.*`,
/// `footer.*`). Rules that mark a cluster of sibling elements in one
/// replacement carry the cluster's lead key; their templates reference
/// the remaining keys directly.
const BUILTIN: &[(&str, &str, &str)] = &[
    // Navigation
    (
        "nav.whyChooseUs",
        r##"<li><a href="#solutions">Защо да изберете нас<svg"##,
        r##"<li><a href="#solutions"><span data-i18n="nav.whyChooseUs">Защо да изберете нас</span><svg"##,
    ),
    (
        "nav.businessSolutions",
        r##"<li><a href="#products">Решения за бизнеса<svg"##,
        r##"<li><a href="#products"><span data-i18n="nav.businessSolutions">Решения за бизнеса</span><svg"##,
    ),
    (
        "nav.contacts",
        r##"<li><a href="#contact-form">Контакти<svg"##,
        r##"<li><a href="#contact-form"><span data-i18n="nav.contacts">Контакти</span><svg"##,
    ),
    (
        "nav.darkMode",
        r#"<span class="dark-mode-label">Тъмен режим</span>"#,
        r#"<span class="dark-mode-label" data-i18n="nav.darkMode">Тъмен режим</span>"#,
    ),
    // Hero section
    (
        "hero.mainTitle",
        r#"<h1 class="banner-title">IBM решения за растеж и устойчивост <span class="text-red">на Вашия бизнес от A1 България</span></h1>"#,
        r#"<h1 class="banner-title"><span data-i18n="hero.mainTitle">IBM решения за растеж и устойчивост</span> <span class="text-red" data-i18n="hero.mainTitleHighlight">на Вашия бизнес от A1 България</span></h1>"#,
    ),
    (
        "hero.ctaButton",
        r##"<a href="#contact-form" class="btn btn-primary">Заявете консултация сега</a> </div> </div> <!-- Banner 2"##,
        "<a href=\"#contact-form\" class=\"btn btn-primary\" data-i18n=\"hero.ctaButton\">Заявете консултация сега</a>\n                                </div>\n                            </div>\n\n                            <!-- Banner 2",
    ),
    (
        "hero.storageTitle",
        r##"<h2>IBM Storage</h2> <p>Сигурно съхранение на данни</p> <a href="#ibm-storage" class="btn btn-primary btn-small">Научете повече</a>"##,
        "<h2 data-i18n=\"hero.storageTitle\">IBM Storage</h2>\n                                <p data-i18n=\"hero.storageDesc\">Сигурно съхранение на данни</p>\n                                <a href=\"#ibm-storage\" class=\"btn btn-primary btn-small\" data-i18n=\"hero.learnMore\">Научете повече</a>",
    ),
    (
        "hero.maximoTitle",
        r##"<h2>IBM Maximo IT</h2> <p>Управление на IT активи</p> <a href="#ibm-maximo" class="btn btn-primary btn-small">Научете повече</a>"##,
        "<h2 data-i18n=\"hero.maximoTitle\">IBM Maximo IT</h2>\n                                <p data-i18n=\"hero.maximoDesc\">Управление на IT активи</p>\n                                <a href=\"#ibm-maximo\" class=\"btn btn-primary btn-small\" data-i18n=\"hero.learnMore\">Научете повече</a>",
    ),
    (
        "hero.watsonxTitle",
        r##"<h2>IBM WatsonX</h2> <p>Генеративен AI за Вашия бизнес</p> <a href="#ibm-watsonx" class="btn btn-primary btn-small">Научете повече</a>"##,
        "<h2 data-i18n=\"hero.watsonxTitle\">IBM WatsonX</h2>\n                                <p data-i18n=\"hero.watsonxDesc\">Генеративен AI за Вашия бизнес</p>\n                                <a href=\"#ibm-watsonx\" class=\"btn btn-primary btn-small\" data-i18n=\"hero.learnMore\">Научете повече</a>",
    ),
    // Tech solutions section
    (
        "techSolutions.title",
        r#"<h2 class="section-title"><span class="text-red">Технологични решения</span> за сигурност, ефективност и интелигентна автоматизация.</h2>"#,
        r#"<h2 class="section-title"><span class="text-red" data-i18n="techSolutions.title">Технологични решения</span><span data-i18n="techSolutions.titleHighlight"> за сигурност, ефективност и интелигентна автоматизация.</span></h2>"#,
    ),
    (
        "techSolutions.usp1Title",
        r#"<h3>Професионално внедряване</h3> <p>Експертна имплементация на решения, адаптирани към Вашите нужди</p>"#,
        "<h3 data-i18n=\"techSolutions.usp1Title\">Професионално внедряване</h3>\n                                <p data-i18n=\"techSolutions.usp1Desc\">Експертна имплементация на решения, адаптирани към Вашите нужди</p>",
    ),
    (
        "techSolutions.usp2Title",
        r#"<h3>SLA-ориентиран подход</h3> <p>Гарантирано качество на услугите с ясно дефинирани нива на обслужване</p>"#,
        "<h3 data-i18n=\"techSolutions.usp2Title\">SLA-ориентиран подход</h3>\n                                <p data-i18n=\"techSolutions.usp2Desc\">Гарантирано качество на услугите с ясно дефинирани нива на обслужване</p>",
    ),
    (
        "techSolutions.usp3Title",
        r#"<h3>Локална <br>експертиза</h3> <p>Специалисти с дълбоко познаване на местния пазар</p>"#,
        "<h3 data-i18n=\"techSolutions.usp3Title\">Локална <br>експертиза</h3>\n                                <p data-i18n=\"techSolutions.usp3Desc\">Специалисти с дълбоко познаване на местния пазар</p>",
    ),
    (
        "techSolutions.ctaButton",
        r##"<div class="cta-center"> <a href="#contact-form" class="btn btn-primary">Заявете консултация сега</a> </div>"##,
        "<div class=\"cta-center\">\n                            <a href=\"#contact-form\" class=\"btn btn-primary\" data-i18n=\"techSolutions.ctaButton\">Заявете консултация сега</a>\n                        </div>",
    ),
    (
        "techSolutions.challengesTitle",
        r#"<h3>Предизвикателства, които срещаме често:</h3>"#,
        r#"<h3 data-i18n="techSolutions.challengesTitle">Предизвикателства, които срещаме често:</h3>"#,
    ),
    (
        "techSolutions.challenge1",
        r#"<li>Растящи разходи и комплексност на инфраструктурата</li>"#,
        r#"<li data-i18n="techSolutions.challenge1">Растящи разходи и комплексност на инфраструктурата</li>"#,
    ),
    (
        "techSolutions.challenge2",
        r#"<li>Липса на достатъчна видимост върху критични активи и процеси</li>"#,
        r#"<li data-i18n="techSolutions.challenge2">Липса на достатъчна видимост върху критични активи и процеси</li>"#,
    ),
    (
        "techSolutions.challenge3",
        r#"<li>Неяснота около генеративния AI, сигурността на данните и регулациите </li>"#,
        r#"<li data-i18n="techSolutions.challenge3">Неяснота около генеративния AI, сигурността на данните и регулациите</li>"#,
    ),
    (
        "techSolutions.solutionsTitle",
        r#"<h3>Как намираме решение и добавяме стойност за Вас:</h3>"#,
        r#"<h3 data-i18n="techSolutions.solutionsTitle">Как намираме решение и добавяме стойност за Вас:</h3>"#,
    ),
    (
        "techSolutions.solution1",
        r#"<li>Консолидирано и защитено съхранение на Вашите данни</li>"#,
        r#"<li data-i18n="techSolutions.solution1">Консолидирано и защитено съхранение на Вашите данни</li>"#,
    ),
    (
        "techSolutions.solution2",
        r#"<li>Единна платформа за управление на активи, поддръжка и надеждност</li>"#,
        r#"<li data-i18n="techSolutions.solution2">Единна платформа за управление на активи, поддръжка и надеждност</li>"#,
    ),
    (
        "techSolutions.solution3",
        r#"<li>Генеративен AI с контрол на данните и управление на риска</li>"#,
        r#"<li data-i18n="techSolutions.solution3">Генеративен AI с контрол на данните и управление на риска</li>"#,
    ),
    // Products section
    (
        "products.sectionTitle",
        r#"<h2 class="section-title">IBM решения за бизнеса от A1 България</h2>"#,
        r#"<h2 class="section-title" data-i18n="products.sectionTitle">IBM решения за бизнеса от A1 България</h2>"#,
    ),
    (
        "products.storage.title",
        r#"<h3 class="product-title">IBM Storage</h3>"#,
        r#"<h3 class="product-title" data-i18n="products.storage.title">IBM Storage</h3>"#,
    ),
    (
        "products.storage.tagline",
        r#"<p class="product-tagline">Сигурно и ефективно съхранение на данни, оптимизирано за съвременните кибер заплахи</p>"#,
        r#"<p class="product-tagline" data-i18n="products.storage.tagline">Сигурно и ефективно съхранение на данни, оптимизирано за съвременните кибер заплахи</p>"#,
    ),
    (
        "products.storage.description",
        r#"<p class="product-description">IBM Storage предоставя висока производителност и киберустойчивост, за да защити бизнес-критичните ви системи и данни. Консолидирате натоварванията и улеснявате управлението на мащаби от данни.</p>"#,
        r#"<p class="product-description" data-i18n="products.storage.description">IBM Storage предоставя висока производителност и киберустойчивост, за да защити бизнес-критичните ви системи и данни. Консолидирате натоварванията и улеснявате управлението на мащаби от данни.</p>"#,
    ),
    (
        "products.featuresTitle",
        r#"<h4>Основни характеристики и USP:</h4>"#,
        r#"<h4 data-i18n="products.featuresTitle">Основни характеристики и USP:</h4>"#,
    ),
    // Contact section
    (
        "contact.sectionTitle",
        r#"<h2 class="section-title">Заявете консултация с експерт</h2>"#,
        r#"<h2 class="section-title" data-i18n="contact.sectionTitle">Заявете консултация с експерт</h2>"#,
    ),
    (
        "contact.nextStepsTitle",
        r#"<h3>Следващи стъпки</h3>"#,
        r#"<h3 data-i18n="contact.nextStepsTitle">Следващи стъпки</h3>"#,
    ),
    // Footer
    (
        "footer.aboutA1",
        r#"<h4>За А1</h4>"#,
        r#"<h4 data-i18n="footer.aboutA1">За А1</h4>"#,
    ),
    (
        "footer.aboutUs",
        r#"<li><a href="https://www.a1.bg/za-a1" target="_blank">За нас</a></li>"#,
        r#"<li><a href="https://www.a1.bg/za-a1" target="_blank" data-i18n="footer.aboutUs">За нас</a></li>"#,
    ),
    (
        "footer.network5g",
        r#"<li><a href="https://www.a1.bg/5g" target="_blank">5G мрежа</a></li>"#,
        r#"<li><a href="https://www.a1.bg/5g" target="_blank" data-i18n="footer.network5g">5G мрежа</a></li>"#,
    ),
    (
        "footer.awards",
        r#"<li><a href="https://www.a1.bg/nagradi-pr" target="_blank">Награди</a></li>"#,
        r#"<li><a href="https://www.a1.bg/nagradi-pr" target="_blank" data-i18n="footer.awards">Награди</a></li>"#,
    ),
    (
        "footer.careers",
        r#"<h4>Кариери</h4>"#,
        r#"<h4 data-i18n="footer.careers">Кариери</h4>"#,
    ),
    (
        "footer.mediaCenter",
        r#"<h4>Медия център</h4>"#,
        r#"<h4 data-i18n="footer.mediaCenter">Медия център</h4>"#,
    ),
    (
        "footer.help",
        r#"<h4>Помощ</h4>"#,
        r#"<h4 data-i18n="footer.help">Помощ</h4>"#,
    ),
    (
        "footer.devices",
        r#"<h4>Устройства</h4>"#,
        r#"<h4 data-i18n="footer.devices">Устройства</h4>"#,
    ),
    (
        "footer.copyright",
        r#"<p>&copy; 2025 А1 България. Всички права запазени.</p>"#,
        r#"<p data-i18n="footer.copyright">&copy; 2025 А1 България. Всички права запазени.</p>"#,
    ),
    (
        "footer.backToTop",
        r#"<button id="backToTop" class="back-to-top" aria-label="Обратно нагоре" title="Обратно нагоре">"#,
        r#"<button id="backToTop" class="back-to-top" aria-label="Обратно нагоре" title="Обратно нагоре" data-i18n="footer.backToTop">"#,
    ),
];
