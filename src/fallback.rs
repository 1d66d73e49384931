//! Static fallback snapshots.
//!
//! Hand-curated data served when a fetch fails or every extraction strategy
//! comes back empty. Always succeeds; marked `origin: fallback` so health
//! checks can tell degraded data from live data.

use crate::snapshot::{Section, Snapshot};

/// Curated schedule covering every branch.
pub fn schedule() -> Snapshot {
    Snapshot::fallback(vec![
        Section::with_entries(
            "Дыбенко",
            [
                "Hip-Hop (новички) Пн, Ср 18:00",
                "Jazz Funk (начальный) Вт, Чт 19:00",
                "Break Dance (база) Вт, Сб 17:00",
                "Contemporary (с нуля) Пт, Вс 15:00",
                "Latina (новички) Ср, Сб 19:00",
            ],
        ),
        Section::with_entries(
            "Купчино",
            [
                "Contemporary (начальный) Пн, Ср 17:30",
                "Shuffle (с нуля) Вт, Чт 18:00",
                "Strip Dance (база) Пт 19:00",
                "Бальные танцы (новички) Пн, Чт 19:30",
            ],
        ),
        Section::with_entries(
            "Звёздная",
            [
                "High Heels (новички) Пн, Чт 19:00",
                "Twerk (начальный) Вт, Пт 18:00",
                "Hip-Hop (с нуля) Пн, Ср 18:00",
                "Акробатика (база) Ср, Сб 17:00",
                "Zumba (для всех) Вс 12:00",
            ],
        ),
        Section::with_entries(
            "Озерки",
            [
                "Latina Solo (новички) Вт, Чт 18:30",
                "Dance Mix (начальный) Пн, Ср 17:00",
                "K-Pop (с нуля) Сб 13:00",
                "Восточные танцы (база) Ср, Сб 20:00",
            ],
        ),
    ])
}

/// Curated price list.
pub fn prices() -> Snapshot {
    Snapshot::fallback(vec![
        Section::with_entries(
            "Абонементы",
            [
                "4 занятия: 3500-4500₽",
                "8 занятий: 6000-8000₽",
                "12 занятий: 8500-10000₽",
            ],
        ),
        Section::with_entries(
            "Разовые занятия",
            ["Групповое: 1000-1500₽", "Индивидуальное: от 1500₽"],
        ),
        Section::with_entries(
            "Скидки и акции",
            [
                "Студентам: -10%",
                "Семейным парам: -15%",
                "При покупке 2+ абонементов: -10%",
            ],
        ),
        Section::with_entries(
            "Пробное занятие",
            ["1000₽ (засчитывается в первый абонемент)"],
        ),
        Section::with_entries(
            "Условия",
            [
                "Срок действия абонемента: 30 дней с даты первого занятия",
                "Заморозка абонемента: до 14 дней по запросу",
            ],
        ),
    ])
}
