//! Mock data the application starts from.
//!
//! Three authorizations for one patient and a handful of trips spread over
//! the lifecycle, so both the user and the coordinator views have something
//! to act on. Ids are fixed so repeated runs show the same records.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use medride_core::service::schedule::ScheduleFormatter;
use medride_types::authorization::{Authorization, AuthorizationId};
use medride_types::config::LocaleConfig;
use medride_types::service::{ServiceId, ServiceRecord, ServiceStatus, SignatureInfo};
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0)
        .single()
        .unwrap_or_default()
}

/// Authorizations available to the demo patient.
pub fn authorizations() -> Vec<Authorization> {
    vec![
        Authorization {
            id: AuthorizationId(Uuid::from_u128(0xa001)),
            voucher_ref: "AUT-2024-0001".to_string(),
            voucher_date: date(2024, 5, 2),
            rate_code: "TR-URB-01".to_string(),
            valid_from: date(2024, 5, 1),
            valid_until: date(2024, 7, 31),
            total_trips: 12,
            used_trips: 4,
        },
        Authorization {
            id: AuthorizationId(Uuid::from_u128(0xa002)),
            voucher_ref: "AUT-2024-0002".to_string(),
            voucher_date: date(2024, 5, 20),
            rate_code: "TR-INT-03".to_string(),
            valid_from: date(2024, 6, 1),
            valid_until: date(2024, 12, 31),
            total_trips: 4,
            used_trips: 0,
        },
        Authorization {
            id: AuthorizationId(Uuid::from_u128(0xa003)),
            voucher_ref: "AUT-2024-0003".to_string(),
            voucher_date: date(2024, 3, 11),
            rate_code: "TR-AMB-02".to_string(),
            valid_from: date(2024, 3, 11),
            valid_until: date(2024, 4, 30),
            total_trips: 2,
            used_trips: 2,
        },
    ]
}

/// A pending record for `authorization` with placeholder trip descriptors.
pub fn pending_record(authorization: &Authorization, number: &str) -> ServiceRecord {
    ServiceRecord {
        id: ServiceId::new(),
        number: number.to_string(),
        authorization_id: authorization.id,
        voucher_ref: authorization.voucher_ref.clone(),
        voucher_date: authorization.voucher_date,
        authorized_rate: authorization.rate_code.clone(),
        contracted_date: String::new(),
        scheduled_date_time: String::new(),
        origin: "Home".to_string(),
        destination: "Clinic".to_string(),
        origin_city: "Bogotá".to_string(),
        destination_city: "Bogotá".to_string(),
        origin_detail: String::new(),
        destination_detail: String::new(),
        notes: String::new(),
        status: ServiceStatus::Pending,
        driver: None,
        plate: None,
        requested_at: Utc::now(),
        cancellation_requested_at: None,
        cancellation_resolved_at: None,
        is_authorized: true,
        signature: SignatureInfo::placeholder(),
    }
}

struct Seed {
    id: u128,
    number: &'static str,
    authorization: usize,
    when: (u32, u32, u32, u32),
    route: (&'static str, &'static str, &'static str, &'static str),
    details: (&'static str, &'static str),
    notes: &'static str,
    status: ServiceStatus,
    crew: Option<(&'static str, &'static str)>,
}

const SEEDS: &[Seed] = &[
    Seed {
        id: 0x5006,
        number: "SRV-000006",
        authorization: 1,
        when: (6, 12, 7, 0),
        route: ("Cra 15 #93-40", "Hospital San Ignacio", "Bogotá", "Bogotá"),
        details: ("Apto 502", "Oncology, 3rd floor"),
        notes: "Patient uses a walker",
        status: ServiceStatus::Pending,
        crew: None,
    },
    Seed {
        id: 0x5005,
        number: "SRV-000005",
        authorization: 1,
        when: (6, 5, 9, 30),
        route: ("Cra 15 #93-40", "Clínica del Country", "Bogotá", "Bogotá"),
        details: ("Apto 502", "Main entrance"),
        notes: "",
        status: ServiceStatus::Open,
        crew: None,
    },
    Seed {
        id: 0x5004,
        number: "SRV-000004",
        authorization: 0,
        when: (5, 28, 14, 0),
        route: ("Cra 15 #93-40", "Hospital Pablo Tobón Uribe", "Bogotá", "Medellín"),
        details: ("Apto 502", "Cardiology"),
        notes: "Intercity, companion travels",
        status: ServiceStatus::CancellationRequested,
        crew: None,
    },
    Seed {
        id: 0x5003,
        number: "SRV-000003",
        authorization: 0,
        when: (5, 21, 8, 15),
        route: ("Cra 15 #93-40", "Fundación Santa Fe", "Bogotá", "Bogotá"),
        details: ("Apto 502", "Dialysis unit"),
        notes: "",
        status: ServiceStatus::Scheduled,
        crew: Some(("Carlos Rojas", "WMK-482")),
    },
    Seed {
        id: 0x5002,
        number: "SRV-000002",
        authorization: 0,
        when: (5, 14, 8, 15),
        route: ("Cra 15 #93-40", "Fundación Santa Fe", "Bogotá", "Bogotá"),
        details: ("Apto 502", "Dialysis unit"),
        notes: "",
        status: ServiceStatus::Completed,
        crew: Some(("Luisa Gómez", "SXT-119")),
    },
    Seed {
        id: 0x5001,
        number: "SRV-000001",
        authorization: 0,
        when: (5, 7, 8, 15),
        route: ("Cra 15 #93-40", "Fundación Santa Fe", "Bogotá", "Bogotá"),
        details: ("Apto 502", "Dialysis unit"),
        notes: "",
        status: ServiceStatus::Cancelled,
        crew: None,
    },
];

/// Seed service records in registry order (most recent first).
///
/// Dates are rendered with `locale`, the same way the registry renders
/// newly created records.
pub fn services(locale: &LocaleConfig) -> Vec<ServiceRecord> {
    let auths = authorizations();
    let formatter = ScheduleFormatter::new(locale);
    SEEDS
        .iter()
        .map(|seed| {
            let auth = &auths[seed.authorization];
            let (month, day, hour, minute) = seed.when;
            let scheduled = at(2024, month, day, hour, minute);
            let requested_at = scheduled - Duration::days(3);

            let mut record = pending_record(auth, seed.number);
            record.id = ServiceId(Uuid::from_u128(seed.id));
            let raw = scheduled.format("%Y-%m-%dT%H:%M").to_string();
            let schedule = formatter.format(Some(&raw));
            record.contracted_date = schedule.contracted_date;
            record.scheduled_date_time = schedule.scheduled_date_time;
            record.origin = seed.route.0.to_string();
            record.destination = seed.route.1.to_string();
            record.origin_city = seed.route.2.to_string();
            record.destination_city = seed.route.3.to_string();
            record.origin_detail = seed.details.0.to_string();
            record.destination_detail = seed.details.1.to_string();
            record.notes = seed.notes.to_string();
            record.status = seed.status;
            record.requested_at = requested_at;
            if let Some((driver, plate)) = seed.crew {
                record.driver = Some(driver.to_string());
                record.plate = Some(plate.to_string());
            }
            match seed.status {
                ServiceStatus::CancellationRequested => {
                    record.cancellation_requested_at = Some(requested_at + Duration::hours(6));
                }
                ServiceStatus::Cancelled | ServiceStatus::NoShow => {
                    record.cancellation_requested_at = Some(requested_at + Duration::hours(6));
                    record.cancellation_resolved_at = Some(requested_at + Duration::hours(8));
                }
                ServiceStatus::Completed => {
                    record.signature = SignatureInfo::captured(18_432);
                }
                _ => {}
            }
            record
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn seeded() -> Vec<ServiceRecord> {
        services(&LocaleConfig::default())
    }

    #[test]
    fn seed_ids_are_unique() {
        let ids: HashSet<_> = seeded().iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), SEEDS.len());
    }

    #[test]
    fn seeds_respect_assignment_pairing() {
        assert!(seeded().iter().all(ServiceRecord::has_consistent_assignment));
    }

    #[test]
    fn cancellation_stamps_follow_the_flow() {
        for record in seeded() {
            let passed_through_request = matches!(
                record.status,
                ServiceStatus::CancellationRequested | ServiceStatus::Cancelled | ServiceStatus::NoShow
            );
            assert_eq!(record.cancellation_requested_at.is_some(), passed_through_request);
        }
    }

    #[test]
    fn seed_dates_follow_the_locale() {
        let default = seeded();
        assert_eq!(default[0].contracted_date, "12/06/2024");
        assert_eq!(default[0].scheduled_date_time, "12/06/2024 07:00");

        let iso = LocaleConfig {
            date_format: "%Y-%m-%d".to_string(),
            time_format: "%H:%M".to_string(),
        };
        let custom = services(&iso);
        assert_eq!(custom[0].contracted_date, "2024-06-12");
        assert_eq!(custom[0].scheduled_date_time, "2024-06-12 07:00");
    }

    #[test]
    fn seed_records_copy_their_authorization() {
        let auths = authorizations();
        for record in seeded() {
            let auth = auths
                .iter()
                .find(|a| a.id == record.authorization_id)
                .expect("seed references a known authorization");
            assert_eq!(record.voucher_ref, auth.voucher_ref);
            assert_eq!(record.authorized_rate, auth.rate_code);
        }
    }
}
