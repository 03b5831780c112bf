//! Display languages and their string tables
//!
//! Languages without a dedicated table render with the English one. The model
//! is still told to answer in the selected language, so the conversation
//! itself is always localized even when the chrome is not.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "zh-TW")]
    ZhTw,
    #[serde(rename = "en")]
    En,
    #[serde(rename = "zh-CN")]
    ZhCn,
    #[serde(rename = "ja")]
    Ja,
    #[serde(rename = "ko")]
    Ko,
    #[serde(rename = "vi")]
    Vi,
    #[serde(rename = "id")]
    Id,
    #[serde(rename = "th")]
    Th,
    #[serde(rename = "hi")]
    Hi,
}

impl Language {
    pub fn all() -> [Language; 9] {
        [
            Language::ZhTw,
            Language::En,
            Language::ZhCn,
            Language::Ja,
            Language::Ko,
            Language::Vi,
            Language::Id,
            Language::Th,
            Language::Hi,
        ]
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::ZhTw => "zh-TW",
            Language::En => "en",
            Language::ZhCn => "zh-CN",
            Language::Ja => "ja",
            Language::Ko => "ko",
            Language::Vi => "vi",
            Language::Id => "id",
            Language::Th => "th",
            Language::Hi => "hi",
        }
    }

    /// Case-insensitive lookup by BCP 47 code
    pub fn from_code(code: &str) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(code.trim()))
    }

    /// The language's name written in that language
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::ZhTw => "繁體中文",
            Language::En => "English",
            Language::ZhCn => "简体中文",
            Language::Ja => "日本語",
            Language::Ko => "한국어",
            Language::Vi => "Tiếng Việt",
            Language::Id => "Bahasa Indo",
            Language::Th => "ภาษาไทย",
            Language::Hi => "हिन्दी",
        }
    }

    pub fn flag(&self) -> &'static str {
        match self {
            Language::ZhTw => "🇹🇼",
            Language::En => "🇺🇸",
            Language::ZhCn => "🇨🇳",
            Language::Ja => "🇯🇵",
            Language::Ko => "🇰🇷",
            Language::Vi => "🇻🇳",
            Language::Id => "🇮🇩",
            Language::Th => "🇹🇭",
            Language::Hi => "🇮🇳",
        }
    }

    pub fn strings(&self) -> &'static Strings {
        match self {
            Language::ZhTw => &ZH_TW,
            Language::ZhCn => &ZH_CN,
            _ => &EN,
        }
    }

    pub fn index(&self) -> usize {
        Self::all().iter().position(|l| l == self).unwrap_or(0)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.flag(), self.native_name())
    }
}

/// Every user-visible label for one language
#[derive(Debug)]
pub struct Strings {
    pub name: &'static str,
    pub subtitle: &'static str,
    pub hero_title: &'static str,
    pub hero_title_highlight: &'static str,
    pub hero_desc: &'static str,
    pub start_chat: &'static str,
    pub learn_more: &'static str,
    pub nav: NavStrings,
    pub features: FeatureStrings,
    pub chat: ChatStrings,
    pub draft: DraftStrings,
    pub analyze: AnalyzeStrings,
    pub footer: FooterStrings,
    pub keys: KeyStrings,
}

#[derive(Debug)]
pub struct NavStrings {
    pub home: &'static str,
    pub chat: &'static str,
    pub draft: &'static str,
    pub analyze: &'static str,
    pub contact: &'static str,
}

#[derive(Debug)]
pub struct FeatureStrings {
    pub chat: Feature,
    pub draft: Feature,
    pub analyze: Feature,
}

#[derive(Debug)]
pub struct Feature {
    pub title: &'static str,
    pub desc: &'static str,
    pub action: &'static str,
}

#[derive(Debug)]
pub struct ChatStrings {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub placeholder: &'static str,
    pub greeting: &'static str,
    pub disclaimer: &'static str,
    pub loading: &'static str,
    pub source: &'static str,
    pub source_placeholder: &'static str,
    pub you: &'static str,
    pub no_answer: &'static str,
    pub error: &'static str,
}

#[derive(Debug)]
pub struct DraftStrings {
    pub title: &'static str,
    pub doc_type: &'static str,
    pub details: &'static str,
    pub details_placeholder: &'static str,
    pub start_btn: &'static str,
    pub preview: &'static str,
    pub copy: &'static str,
    pub copy_success: &'static str,
    pub empty: &'static str,
    pub legal_basis: &'static str,
    pub types: DocumentTypeStrings,
}

#[derive(Debug)]
pub struct DocumentTypeStrings {
    pub letter: &'static str,
    pub contract: &'static str,
    pub settlement: &'static str,
    pub rental: &'static str,
    pub labor: &'static str,
    pub iou: &'static str,
}

#[derive(Debug)]
pub struct AnalyzeStrings {
    pub title: &'static str,
    pub placeholder: &'static str,
    pub start_btn: &'static str,
    pub report_title: &'static str,
    pub disclaimer: &'static str,
    pub completed: &'static str,
}

/// Key hints, mode badges and popup text
#[derive(Debug)]
pub struct KeyStrings {
    pub normal: &'static str,
    pub editing: &'static str,
    pub select: &'static str,
    pub open: &'static str,
    pub language: &'static str,
    pub quit: &'static str,
    pub type_text: &'static str,
    pub scroll: &'static str,
    pub next: &'static str,
    pub send: &'static str,
    pub stop_typing: &'static str,
    pub details: &'static str,
    pub draft: &'static str,
    pub focus: &'static str,
    pub paste: &'static str,
    pub analyze: &'static str,
    pub submit: &'static str,
    pub newline: &'static str,
    pub api_key_missing: &'static str,
    pub language_title: &'static str,
    pub api_key_title: &'static str,
    pub api_key_help: &'static str,
    pub key_from_env: &'static str,
    pub key_from_config: &'static str,
    pub key_none: &'static str,
    pub characters: &'static str,
}

#[derive(Debug)]
pub struct FooterStrings {
    pub desc: &'static str,
    pub disclaimer: &'static str,
}

static ZH_TW: Strings = Strings {
    name: "AI 律師助手",
    subtitle: "您的專屬法律守護者",
    hero_title: "被法律問題困擾？別怕，只需",
    hero_title_highlight: "一鍵求助",
    hero_desc: "法律不該是富人的專利。面對房東刁難、雇主剝削時的無助與焦慮，我們都懂。這是一個專為資源匱乏的你打造的免費避風港，讓 AI 為你撐腰。",
    start_chat: "開始諮詢",
    learn_more: "了解心意",
    nav: NavStrings {
        home: "首頁",
        chat: "法律諮詢",
        draft: "文書起草",
        analyze: "案件分析",
        contact: "聯絡律師",
    },
    features: FeatureStrings {
        chat: Feature {
            title: "AI 溫暖諮詢",
            desc: "你不必獨自面對冷冰冰的法條。告訴我們你的困難，我們即時為你提供指引。",
            action: "立即傾訴",
        },
        draft: Feature {
            title: "免費文書起草",
            desc: "別讓昂貴的代書費成為門檻。自動生成存證信函與合約，保護你的權益。",
            action: "開始起草",
        },
        analyze: Feature {
            title: "案件風險守護",
            desc: "擔心簽下不平等條約？貼上內容，讓我們幫你把關。",
            action: "進行分析",
        },
    },
    chat: ChatStrings {
        title: "法律諮詢聊天室",
        subtitle: "我們在這裡聽你說，支援多國語言",
        placeholder: "請告訴我們發生了什麼事 (如：房東不退押金)...",
        greeting: "您好！我是您的 AI 律師助手。遇到法律問題難免心慌，別擔心，我會盡力協助您。請問發生了什麼事？（例如：租屋糾紛、打工薪資、簽證問題）",
        disclaimer: "AI 給予的是建議與陪伴，重要決策請務必諮詢專業律師。",
        loading: "正在為您分析案情並查閱法條",
        source: "參考來源",
        source_placeholder: "來源",
        you: "你",
        no_answer: "抱歉，目前無法回答，請稍後再試。",
        error: "發生錯誤，請再試一次。",
    },
    draft: DraftStrings {
        title: "設定文件參數",
        doc_type: "文件類型",
        details: "詳細資訊",
        details_placeholder: "請輸入詳細資訊 (可用您的母語輸入)，例如：\n- 當事人姓名\n- 事件經過、日期、金額\n- 您的訴求",
        start_btn: "為我起草",
        preview: "文件預覽",
        copy: "複製內容",
        copy_success: "已複製",
        empty: "您的法律文件將顯示於此",
        legal_basis: "法律依據",
        types: DocumentTypeStrings {
            letter: "存證信函 (Demand Letter)",
            contract: "一般契約 (General Contract)",
            settlement: "和解書 (Settlement Agreement)",
            rental: "租賃契約 (Lease Agreement)",
            labor: "勞動契約 (Labor Contract)",
            iou: "借據 (IOU)",
        },
    },
    analyze: AnalyzeStrings {
        title: "案件風險線上分析",
        placeholder: "請將合約內容、律師函或讓你感到不安的案件經過貼在這裡...",
        start_btn: "幫我分析",
        report_title: "AI 分析報告",
        disclaimer: "此分析由 AI 生成，希望能為您提供方向與信心。",
        completed: "分析完成",
    },
    footer: FooterStrings {
        desc: "本工具由 Google Gemini AI 提供技術支援，致力於實現法律平權。",
        disclaimer: "溫馨提醒：本工具僅供參考。若遇重大案件，請尋求法律扶助基金會 (02-412-8518) 協助。你不是一個人。",
    },
    keys: KeyStrings {
        normal: "瀏覽",
        editing: "輸入",
        select: "選擇",
        open: "開啟",
        language: "語言",
        quit: "離開",
        type_text: "輸入訊息",
        scroll: "捲動",
        next: "下一頁",
        send: "送出",
        stop_typing: "結束輸入",
        details: "填寫內容",
        draft: "起草",
        focus: "切換欄位",
        paste: "貼上或輸入",
        analyze: "分析",
        submit: "送出",
        newline: "換行",
        api_key_missing: "尚未設定金鑰 (K)",
        language_title: "選擇語言 (Enter 確認 / Esc 取消)",
        api_key_title: "Gemini 金鑰",
        api_key_help: "請在下方貼上金鑰。Enter 儲存，Esc 取消。",
        key_from_env: "目前金鑰：環境變數",
        key_from_config: "目前金鑰：設定檔",
        key_none: "尚未設定金鑰",
        characters: "個字元",
    },
};

static EN: Strings = Strings {
    name: "AI Lawyer Assistant",
    subtitle: "Your Guardian in Law",
    hero_title: "Feeling overwhelmed by law? Just ",
    hero_title_highlight: "one key for help",
    hero_desc: "Justice shouldn't be expensive. Facing a landlord dispute or unfair work conditions far from home is stressful. This free tool is built for people with limited resources. Let AI be your shield.",
    start_chat: "Start Consultation",
    learn_more: "Our Mission",
    nav: NavStrings {
        home: "Home",
        chat: "Consultation",
        draft: "Drafting",
        analyze: "Analysis",
        contact: "Contact Lawyer",
    },
    features: FeatureStrings {
        chat: Feature {
            title: "AI Supportive Chat",
            desc: "You don't have to face cold laws alone. Tell us your troubles and get instant guidance.",
            action: "Talk to Us",
        },
        draft: Feature {
            title: "Free Doc Drafting",
            desc: "Don't let fees stop you. Generate letters and contracts that protect your rights.",
            action: "Start Drafting",
        },
        analyze: Feature {
            title: "Risk Protection",
            desc: "Worried about signing unfair terms? Paste it here and we will watch out for you.",
            action: "Analyze Now",
        },
    },
    chat: ChatStrings {
        title: "Legal Consultation Chat",
        subtitle: "We are here to listen, in any language",
        placeholder: "Tell us what happened (e.g., Landlord won't return deposit)...",
        greeting: "Hello! I am your AI Lawyer Assistant. Dealing with legal issues is stressful, but I'm here to help. What can I do for you? (e.g., Rental disputes, Salary issues)",
        disclaimer: "AI provides guidance and support. For critical decisions, please consult a lawyer.",
        loading: "Carefully reviewing laws",
        source: "Sources",
        source_placeholder: "Source",
        you: "You",
        no_answer: "Sorry, I cannot answer right now.",
        error: "Error. Please try again.",
    },
    draft: DraftStrings {
        title: "Document Settings",
        doc_type: "Document Type",
        details: "Details",
        details_placeholder: "Enter details (in your language), e.g.:\n- Names of parties\n- Incident details, date, amount\n- Your requests",
        start_btn: "Draft for Me",
        preview: "Preview",
        copy: "Copy",
        copy_success: "Copied",
        empty: "Your document will appear here",
        legal_basis: "Legal Basis",
        types: DocumentTypeStrings {
            letter: "Demand Letter",
            contract: "General Contract",
            settlement: "Settlement Agreement",
            rental: "Lease Agreement",
            labor: "Labor Contract",
            iou: "IOU",
        },
    },
    analyze: AnalyzeStrings {
        title: "Online Case Risk Analysis",
        placeholder: "Paste contract content, lawyer letters, or details that worry you here...",
        start_btn: "Analyze for Me",
        report_title: "AI Analysis Report",
        disclaimer: "Generated by AI to give you direction and confidence.",
        completed: "Completed",
    },
    footer: FooterStrings {
        desc: "Powered by Google Gemini AI. Dedicated to legal equality.",
        disclaimer: "Note: For reference only. For serious cases, please reach out to the Legal Aid Foundation (02-412-8518). You are not alone.",
    },
    keys: KeyStrings {
        normal: "NORMAL",
        editing: "EDIT",
        select: "select",
        open: "open",
        language: "language",
        quit: "quit",
        type_text: "type",
        scroll: "scroll",
        next: "next",
        send: "send",
        stop_typing: "stop typing",
        details: "details",
        draft: "draft",
        focus: "focus",
        paste: "paste/type",
        analyze: "analyze",
        submit: "submit",
        newline: "newline",
        api_key_missing: "API key? (K)",
        language_title: "Language (Enter / Esc)",
        api_key_title: "Gemini API Key",
        api_key_help: "Paste your API key below. Press Enter to save, Esc to cancel.",
        key_from_env: "Current key: environment variable",
        key_from_config: "Current key: config file",
        key_none: "No key configured",
        characters: "characters",
    },
};

static ZH_CN: Strings = Strings {
    name: "AI 律师助手",
    subtitle: "您的专属法律守护者",
    hero_title: "被法律问题困扰？别怕，只需",
    hero_title_highlight: "一键求助",
    hero_desc: "法律不该是富人的专利。面对房东刁难、雇主剥削时的无助与焦虑，我们都懂。这是一个为资源匮乏的你打造的免费避风港，让 AI 为你撑腰。",
    start_chat: "开始咨询",
    learn_more: "了解心意",
    nav: NavStrings {
        home: "首页",
        chat: "法律咨询",
        draft: "文书起草",
        analyze: "案件分析",
        contact: "联系律师",
    },
    features: FeatureStrings {
        chat: Feature {
            title: "AI 温暖咨询",
            desc: "你不必独自面对冷冰冰的法条。告诉我们你的困难，我们即时为你提供指引。",
            action: "立即倾诉",
        },
        draft: Feature {
            title: "免费文书起草",
            desc: "别让昂贵的代书费成为门槛。自动生成律师函与合同，保护你的权益。",
            action: "开始起草",
        },
        analyze: Feature {
            title: "案件风险守护",
            desc: "担心签下不平等条约？贴上内容，让我们帮你把关。",
            action: "进行分析",
        },
    },
    chat: ChatStrings {
        title: "法律咨询聊天室",
        subtitle: "我们在这里听你说，支持多国语言",
        placeholder: "请告诉我们发生了什么事 (如：房东不退押金)...",
        greeting: "您好！我是您的 AI 律师助手。遇到法律问题难免心慌，别担心，我会尽力协助您。请问发生了什么事？（例如：租房纠纷、打工薪资、签证问题）",
        disclaimer: "AI 给予的是建议与陪伴，重要决策请务必咨询专业律师。",
        loading: "正在为您分析案情并查阅法条",
        source: "参考来源",
        source_placeholder: "来源",
        you: "你",
        no_answer: "抱歉，目前无法回答，请稍后再试。",
        error: "发生错误，请再试一次。",
    },
    draft: DraftStrings {
        title: "设置文件参数",
        doc_type: "文件类型",
        details: "详细信息",
        details_placeholder: "请输入详细信息 (可用您的母语输入)，例如：\n- 当事人姓名\n- 事件经过、日期、金额\n- 您的诉求",
        start_btn: "为我起草",
        preview: "文件预览",
        copy: "复制内容",
        copy_success: "已复制",
        empty: "您的法律文件将显示于此",
        legal_basis: "法律依据",
        types: DocumentTypeStrings {
            letter: "律师函 (Demand Letter)",
            contract: "一般合同 (General Contract)",
            settlement: "和解协议 (Settlement Agreement)",
            rental: "租赁合同 (Lease Agreement)",
            labor: "劳动合同 (Labor Contract)",
            iou: "借条 (IOU)",
        },
    },
    analyze: AnalyzeStrings {
        title: "案件风险在线分析",
        placeholder: "请将合同内容、律师函或让你感到不安的案件经过贴在这里...",
        start_btn: "帮我分析",
        report_title: "AI 分析报告",
        disclaimer: "此分析由 AI 生成，希望能为您提供方向与信心。",
        completed: "分析完成",
    },
    footer: FooterStrings {
        desc: "本工具由 Google Gemini AI 提供技术支持，致力于实现法律平权。",
        disclaimer: "温馨提醒：本工具仅供参考。若遇重大案件，请寻求当地法律援助机构协助。你不是一个人。",
    },
    keys: KeyStrings {
        normal: "浏览",
        editing: "输入",
        select: "选择",
        open: "打开",
        language: "语言",
        quit: "退出",
        type_text: "输入消息",
        scroll: "滚动",
        next: "下一页",
        send: "发送",
        stop_typing: "结束输入",
        details: "填写内容",
        draft: "起草",
        focus: "切换栏位",
        paste: "粘贴或输入",
        analyze: "分析",
        submit: "提交",
        newline: "换行",
        api_key_missing: "尚未设置密钥 (K)",
        language_title: "选择语言 (Enter 确认 / Esc 取消)",
        api_key_title: "Gemini 密钥",
        api_key_help: "请在下方粘贴密钥。Enter 保存，Esc 取消。",
        key_from_env: "当前密钥：环境变量",
        key_from_config: "当前密钥：配置文件",
        key_none: "尚未设置密钥",
        characters: "个字符",
    },
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_matches_every_language() {
        for lang in Language::all() {
            assert_eq!(Language::from_code(lang.code()), Some(lang));
        }
        assert_eq!(Language::from_code("ZH-tw"), Some(Language::ZhTw));
        assert_eq!(Language::from_code("fr"), None);
    }

    #[test]
    fn test_untranslated_languages_fall_back_to_english() {
        for lang in [Language::Ja, Language::Ko, Language::Vi, Language::Id, Language::Th, Language::Hi] {
            assert_eq!(lang.strings().name, EN.name);
        }
        assert_eq!(Language::ZhTw.strings().nav.chat, "法律諮詢");
        assert_eq!(Language::ZhCn.strings().nav.chat, "法律咨询");
        assert_eq!(Language::Ko.strings().keys.quit, "quit");
        assert_eq!(Language::ZhTw.strings().keys.quit, "離開");
    }

    #[test]
    fn test_default_is_traditional_chinese() {
        assert_eq!(Language::default(), Language::ZhTw);
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&Language::ZhCn).unwrap();
        assert_eq!(json, "\"zh-CN\"");
        let parsed: Language = serde_json::from_str("\"th\"").unwrap();
        assert_eq!(parsed, Language::Th);
    }

    #[test]
    fn test_index_matches_picker_order() {
        for (i, lang) in Language::all().iter().enumerate() {
            assert_eq!(lang.index(), i);
        }
    }
}
