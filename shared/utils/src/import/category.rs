//! Category inference from free text.

use once_cell::sync::Lazy;
use partbin_models::Category;
use regex::Regex;

struct CategoryRule {
    category: Category,
    pattern: Regex,
}

impl CategoryRule {
    fn new(category: Category, pattern: &str) -> Self {
        Self {
            category,
            pattern: Regex::new(pattern).expect("valid category pattern"),
        }
    }
}

/// Ordered rules over lower-cased text; the first match wins.
static CATEGORY_RULES: Lazy<Vec<CategoryRule>> = Lazy::new(|| {
    vec![
        CategoryRule::new(
            Category::IntegratedCircuits,
            r"atmega|stm32|esp32|pic|mcu|microcontroller|processor|ic|芯片|单片机|sop|ssop|tssop|qfn|lqfp",
        ),
        CategoryRule::new(
            Category::Resistors,
            r"resistor|ohm|ω|kω|mω|电阻|贴片电阻|[0-9]+r[0-9]+|[0-9]+k[0-9]+|[0-9]+m[0-9]+",
        ),
        CategoryRule::new(
            Category::Capacitors,
            r"capacitor|farad|µf|μf|uf|pf|nf|电容|贴片电容|钽电容|电解电容",
        ),
        CategoryRule::new(
            Category::Transistors,
            r"transistor|mosfet|bjt|fet|晶体管|三极管|mos管|n-channel|p-channel|npn|pnp",
        ),
        CategoryRule::new(
            Category::Diodes,
            r"diode|led|zener|schottky|tvs|esd|二极管|发光二极管|整流|稳压二极管|肖特基",
        ),
        CategoryRule::new(
            Category::Connectors,
            r"connector|header|socket|plug|usb|type-c|type-a|hdmi|rj45|连接器|排针|排母|接插件|插座",
        ),
        CategoryRule::new(Category::Inductors, r"inductor|inductance|uh|nh|mh|电感|贴片电感"),
        CategoryRule::new(
            Category::Sensors,
            r"sensor|temperature|humidity|pressure|accelerometer|gyro|传感器|温度|湿度|压力|加速度",
        ),
        CategoryRule::new(Category::Switches, r"switch|button|key|开关|按键|轻触开关"),
    ]
});

/// Infers a part's category from its name and description. Falls back to
/// [`Category::Other`].
pub fn infer_category(name: &str, description: &str) -> Category {
    let text = format!("{} {}", name, description).to_lowercase();

    CATEGORY_RULES
        .iter()
        .find(|rule| rule.pattern.is_match(&text))
        .map(|rule| rule.category)
        .unwrap_or(Category::Other)
}
