//! Static knowledge base of dance styles offered by the studio.
//!
//! Used by the chat prompt builder and the `/api/v1/styles` endpoint.
//! Immutable, process-wide data — the styles catalogue changes a few times a
//! year at most and is maintained by hand.

use crate::branches::normalize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct StyleInfo {
    pub name: &'static str,
    pub summary: &'static str,
    pub for_beginners: &'static str,
    pub tags: &'static [&'static str],
}

pub const STYLES: &[StyleInfo] = &[
    StyleInfo {
        name: "Hip-Hop",
        summary: "Уличный танец с базой из popping, locking и house. Развивает ритмичность и свободу движений.",
        for_beginners: "Да, есть группы с нуля.",
        tags: &["хип-хоп", "hip-hop", "hip hop", "уличные"],
    },
    StyleInfo {
        name: "Jazz Funk",
        summary: "Смесь джаза, хип-хопа и фанка: изоляции, волны, резкие остановки.",
        for_beginners: "Да, есть начальные группы.",
        tags: &["джаз фанк", "jazz funk", "джаз-фанк"],
    },
    StyleInfo {
        name: "Contemporary",
        summary: "Современный сценический танец на стыке балета, джаза и модерна.",
        for_beginners: "Да, можно начать с базовых техник.",
        tags: &["контемп", "contemporary", "современные"],
    },
    StyleInfo {
        name: "High Heels",
        summary: "Женственный стиль на каблуках с элементами стрип-пластики и латины.",
        for_beginners: "Да, начинаем с низких каблуков.",
        tags: &["каблуки", "high heels", "хай хилс"],
    },
    StyleInfo {
        name: "Break Dance",
        summary: "Акробатический уличный стиль: футворк, пауэр-мувы, фризы.",
        for_beginners: "Да, базовые группы для детей и взрослых.",
        tags: &["брейк", "break", "брейкинг"],
    },
    StyleInfo {
        name: "Latina",
        summary: "Сальса, бачата, меренге и реггетон — парные и сольные латиноамериканские танцы.",
        for_beginners: "Да, можно приходить одному или в паре.",
        tags: &["латина", "latina", "сальса", "бачата"],
    },
    StyleInfo {
        name: "Twerk",
        summary: "Энергичный стиль с акцентом на работу бёдер и корпуса.",
        for_beginners: "Да, есть начальный уровень.",
        tags: &["тверк", "twerk"],
    },
    StyleInfo {
        name: "K-Pop",
        summary: "Постановки в стиле корейских поп-групп, работа в синхроне.",
        for_beginners: "Да, группы с нуля.",
        tags: &["кпоп", "k-pop", "kpop"],
    },
    StyleInfo {
        name: "Zumba",
        summary: "Танцевальный фитнес под латиноамериканскую музыку.",
        for_beginners: "Да, подходит для любого уровня.",
        tags: &["зумба", "zumba", "фитнес"],
    },
    StyleInfo {
        name: "Dance Mix",
        summary: "Микс современных направлений в одном занятии, хорош для старта.",
        for_beginners: "Да, создан для новичков.",
        tags: &["дэнс микс", "dance mix", "микс"],
    },
    StyleInfo {
        name: "Shuffle",
        summary: "Быстрая работа ног под электронную музыку: running man, T-step и связки.",
        for_beginners: "Да, базовые шаги разучиваются с нуля.",
        tags: &["шаффл", "shuffle"],
    },
    StyleInfo {
        name: "Strip Dance",
        summary: "Пластичный женственный стиль, работа с корпусом и полом.",
        for_beginners: "Да, есть группы начального уровня.",
        tags: &["стрип", "strip dance", "стрип-пластика"],
    },
    StyleInfo {
        name: "Бальные танцы",
        summary: "Европейская и латиноамериканская программы: вальс, танго, ча-ча-ча.",
        for_beginners: "Да, пары формируются в группе.",
        tags: &["бальные", "ballroom", "вальс", "танго"],
    },
    StyleInfo {
        name: "Восточные танцы",
        summary: "Танец живота и восточная пластика, работа с изоляциями.",
        for_beginners: "Да, подходит для любого возраста.",
        tags: &["восточные", "танец живота", "belly dance", "беллиданс"],
    },
    StyleInfo {
        name: "Акробатика",
        summary: "Кувырки, стойки, колёса и сальто с постепенным усложнением.",
        for_beginners: "Да, с разминкой и страховкой тренера.",
        tags: &["акробатика", "acro", "сальто"],
    },
];

/// Find the first style whose name or tag occurs in the text.
pub fn find(text: &str) -> Option<&'static StyleInfo> {
    let haystack = normalize(text);
    STYLES.iter().find(|s| {
        haystack.contains(&normalize(s.name))
            || s.tags.iter().any(|t| haystack.contains(&normalize(t)))
    })
}

/// One-line-per-style digest for the chat system prompt.
pub fn digest() -> String {
    STYLES
        .iter()
        .map(|s| format!("- {}: {} Новичкам: {}", s.name, s.summary, s.for_beginners))
        .collect::<Vec<_>>()
        .join("\n")
}
