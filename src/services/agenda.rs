//! Calendar and agenda derivations over cached reservations

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::{
    error::AppResult,
    models::{
        agenda::{AgendaCell, AgendaSlot, CalendarCell, CourtAgenda, DayAgenda, DayMetrics, MonthCalendar},
        Court, PaymentStatus, Reservation,
    },
    scheduling::{occupancy::DayOccupancy, time::HALF_HOUR_SLOTS},
    services::cache::month_bounds,
};

const MONTH_NAMES: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

const MAX_COURT_DOTS: usize = 3;

pub fn month_label(year: i32, month: u32) -> String {
    let name = MONTH_NAMES
        .get(month.wrapping_sub(1) as usize)
        .copied()
        .unwrap_or("?");
    format!("{} {}", name, year)
}

/// Active reservations in a day's list
pub fn active_count(reservations: &[Reservation]) -> usize {
    reservations.iter().filter(|r| r.is_active()).count()
}

/// Distinct courts of a day's active reservations, first-seen order, at most three
pub fn day_dots(reservations: &[Reservation]) -> Vec<i64> {
    let mut dots = Vec::with_capacity(MAX_COURT_DOTS);
    for r in reservations.iter().filter(|r| r.is_active()) {
        if dots.len() == MAX_COURT_DOTS {
            break;
        }
        if !dots.contains(&r.court_id) {
            dots.push(r.court_id);
        }
    }
    dots
}

/// Month grid. Days missing from `days` count as empty.
pub fn month_calendar(
    year: i32,
    month: u32,
    days: &BTreeMap<NaiveDate, &[Reservation]>,
    today_count: usize,
) -> AppResult<MonthCalendar> {
    let (first, last) = month_bounds(year, month)?;
    let padding = first.weekday().num_days_from_sunday() as usize;

    let mut cells = vec![CalendarCell::Empty; padding];
    cells.extend(first.iter_days().take_while(|d| *d <= last).map(|date| {
        let reservations = days.get(&date).copied().unwrap_or_default();
        CalendarCell::Day {
            day: date.day(),
            date,
            booked: active_count(reservations),
            court_dots: day_dots(reservations),
        }
    }));

    Ok(MonthCalendar {
        year,
        month,
        label: month_label(year, month),
        today_count,
        cells,
    })
}

pub fn day_metrics(reservations: &[Reservation]) -> DayMetrics {
    let mut metrics = DayMetrics::default();
    for r in reservations {
        match r.payment_status {
            PaymentStatus::Cancelled => {
                metrics.cancelled += 1;
                continue;
            }
            PaymentStatus::Paid => metrics.paid_total += r.total_amount,
            PaymentStatus::Pending | PaymentStatus::Partial => metrics.pending += 1,
        }
        metrics.booked += 1;
        metrics.outstanding += r.outstanding().max(Decimal::ZERO);
    }
    metrics
}

/// Active reservations with money still owed, earliest first
pub fn to_collect(reservations: &[Reservation]) -> Vec<Reservation> {
    let mut owed: Vec<Reservation> = reservations
        .iter()
        .filter(|r| r.is_active() && r.payment_status != PaymentStatus::Paid)
        .cloned()
        .collect();
    owed.sort_by_key(|r| r.start_at);
    owed
}

/// Per-court slot grid plus metrics for one day
pub fn day_agenda<'a, C>(date: NaiveDate, courts: C, reservations: &[Reservation]) -> DayAgenda
where
    C: IntoIterator<Item = &'a Court>,
{
    let occupancy = DayOccupancy::build(date, reservations);

    let courts = courts
        .into_iter()
        .filter(|c| c.is_active)
        .map(|court| {
            let slots = HALF_HOUR_SLOTS
                .iter()
                .map(|&slot| {
                    let cell = match occupancy.get(court.id, slot) {
                        Some(taken) => AgendaCell::Booked {
                            reservation_id: taken.reservation.id,
                            is_start: taken.is_first_slot,
                            status: taken.reservation.payment_status,
                            status_label: taken.reservation.payment_status.label().to_string(),
                            client_name: taken.reservation.client_notes().client_name,
                        },
                        None => AgendaCell::Free,
                    };
                    AgendaSlot {
                        slot,
                        label: slot.to_string(),
                        cell,
                    }
                })
                .collect();
            CourtAgenda::for_court(court, slots)
        })
        .collect();

    DayAgenda {
        date,
        metrics: day_metrics(reservations),
        courts,
        to_collect: to_collect(reservations),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, d).unwrap()
    }

    fn res(id: i64, court_id: i64, hour: u32, total: i64, paid: i64, status: PaymentStatus) -> Reservation {
        Reservation {
            id,
            court_id,
            court_name: None,
            start_at: date(14).and_hms_opt(hour, 0, 0).unwrap(),
            end_at: date(14).and_hms_opt(hour + 1, 0, 0).unwrap(),
            total_amount: Decimal::from(total),
            paid_amount: Decimal::from(paid),
            payment_method: None,
            payment_status: status,
            notes: Some(format!("Cliente: Cliente {}", id)),
        }
    }

    fn court(id: i64, is_active: bool) -> Court {
        Court {
            id,
            name: format!("Cancha {}", id),
            hourly_price: Decimal::from(80),
            is_active,
            complex_id: None,
        }
    }

    #[test]
    fn test_month_label() {
        assert_eq!(month_label(2026, 8), "Agosto 2026");
        assert_eq!(month_label(2027, 1), "Enero 2027");
    }

    #[test]
    fn test_day_dots_distinct_and_capped() {
        let rs = vec![
            res(1, 3, 9, 80, 0, PaymentStatus::Pending),
            res(2, 3, 10, 80, 0, PaymentStatus::Pending),
            res(3, 9, 11, 80, 0, PaymentStatus::Cancelled),
            res(4, 1, 12, 80, 0, PaymentStatus::Paid),
            res(5, 2, 13, 80, 0, PaymentStatus::Partial),
            res(6, 5, 14, 80, 0, PaymentStatus::Pending),
        ];
        assert_eq!(day_dots(&rs), vec![3, 1, 2]);
        assert_eq!(active_count(&rs), 5);
    }

    #[test]
    fn test_month_calendar_pads_to_weekday() {
        // 2026-08-01 is a Saturday
        let rs = vec![res(1, 2, 10, 80, 0, PaymentStatus::Pending)];
        let mut days = BTreeMap::new();
        days.insert(date(14), rs.as_slice());

        let calendar = month_calendar(2026, 8, &days, 1).unwrap();

        assert_eq!(calendar.label, "Agosto 2026");
        assert_eq!(calendar.cells.len(), 6 + 31);
        assert!(calendar.cells[..6].iter().all(|c| *c == CalendarCell::Empty));
        assert_eq!(
            calendar.cells[6],
            CalendarCell::Day { day: 1, date: date(1), booked: 0, court_dots: vec![] }
        );
        assert_eq!(
            calendar.cells[6 + 13],
            CalendarCell::Day { day: 14, date: date(14), booked: 1, court_dots: vec![2] }
        );
    }

    #[test]
    fn test_day_metrics() {
        let rs = vec![
            res(1, 1, 9, 80, 80, PaymentStatus::Paid),
            res(2, 1, 10, 80, 30, PaymentStatus::Partial),
            res(3, 1, 11, 120, 0, PaymentStatus::Pending),
            res(4, 1, 12, 80, 0, PaymentStatus::Cancelled),
        ];
        let m = day_metrics(&rs);
        assert_eq!(m.booked, 3);
        assert_eq!(m.paid_total, Decimal::from(80));
        assert_eq!(m.outstanding, Decimal::from(50 + 120));
        assert_eq!(m.pending, 2);
        assert_eq!(m.cancelled, 1);
    }

    #[test]
    fn test_to_collect_sorted_by_start() {
        let rs = vec![
            res(1, 1, 18, 80, 0, PaymentStatus::Pending),
            res(2, 1, 9, 80, 80, PaymentStatus::Paid),
            res(3, 2, 11, 80, 20, PaymentStatus::Partial),
            res(4, 1, 7, 80, 0, PaymentStatus::Cancelled),
        ];
        let ids: Vec<i64> = to_collect(&rs).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_day_agenda_marks_booked_slots() {
        let rs = vec![res(7, 1, 18, 80, 0, PaymentStatus::Pending)];
        let courts = vec![court(1, true), court(2, false)];

        let agenda = day_agenda(date(14), &courts, &rs);

        assert_eq!(agenda.courts.len(), 1);
        let slots = &agenda.courts[0].slots;
        assert_eq!(slots.len(), HALF_HOUR_SLOTS.len());
        let booked: Vec<&AgendaSlot> = slots
            .iter()
            .filter(|s| matches!(s.cell, AgendaCell::Booked { .. }))
            .collect();
        assert_eq!(booked.len(), 2);
        assert_eq!(booked[0].label, "18:00");
        assert_eq!(
            booked[0].cell,
            AgendaCell::Booked {
                reservation_id: 7,
                is_start: true,
                status: PaymentStatus::Pending,
                status_label: "Pendiente".to_string(),
                client_name: "Cliente 7".to_string(),
            }
        );
        assert!(matches!(booked[1].cell, AgendaCell::Booked { is_start: false, .. }));
        assert_eq!(agenda.metrics.booked, 1);
        assert_eq!(agenda.to_collect.len(), 1);
    }
}
