use rand::Rng;
use time::OffsetDateTime;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// `session_<9 random base36 chars>_<unix millis>`
pub fn generate_session_id() -> String {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    session_id_with(&mut rand::thread_rng(), millis)
}

pub fn session_id_with<R: Rng + ?Sized>(rng: &mut R, millis: i128) -> String {
    let random: String = (0..9)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("session_{random}_{millis}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn session_id_shape() {
        let id = session_id_with(&mut StdRng::seed_from_u64(7), 1_714_557_600_000);
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "session");
        assert_eq!(parts[1].len(), 9);
        assert!(parts[1].chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        assert_eq!(parts[2], "1714557600000");
    }

    #[test]
    fn generated_ids_differ() {
        assert_ne!(generate_session_id(), generate_session_id());
    }
}
