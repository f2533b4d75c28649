use tagseal::key::MasterKey;
use tagseal::lifecycle::{self, TagState};
use tagseal::policy::{self, AccessCondition, AccessPolicy, CommMode, SdmPolicy, NDEF_FILE_NO};
use tagseal::sun::{
    compute_code, derive_session_key, ScanCounter, ScanMessage, SdmCode, SunVerifier, Uid,
};
use tagseal::token::{self, MemoryStore};
use tagseal::transport::{AuthOutcome, TagTransport};

/// A tag simulated in memory, standing in for a reader with a real one in
/// its field.
struct DeskTag {
    key: MasterKey,
    uid: Uid,
    counter: u32,
    settings: Option<(u8, Vec<u8>)>,
}

impl DeskTag {
    fn fresh(uid: Uid) -> DeskTag {
        DeskTag {
            key: MasterKey::DEFAULT,
            uid,
            counter: 0,
            settings: None,
        }
    }

    /// One simulated scan: the counter advances and the mirrors fill in.
    fn scan(&mut self) -> (ScanMessage, SdmCode) {
        self.counter += 1;
        let counter = ScanCounter::new(self.counter).unwrap();
        let session_key = derive_session_key(&self.key, &self.uid, counter);

        (
            ScanMessage::new(self.uid, counter),
            compute_code(&session_key, &[]),
        )
    }
}

impl TagTransport for DeskTag {
    fn authenticate(
        &mut self,
        _key_no: u8,
        key: &MasterKey,
    ) -> tagseal::transport::Result<AuthOutcome> {
        if *key == self.key {
            Ok(AuthOutcome::Accepted)
        } else {
            Ok(AuthOutcome::Rejected)
        }
    }

    fn change_key(
        &mut self,
        _key_no: u8,
        _old_key: &MasterKey,
        new_key: &MasterKey,
        _key_version: u8,
    ) -> tagseal::transport::Result<()> {
        self.key = new_key.clone();
        Ok(())
    }

    fn change_file_settings(
        &mut self,
        file_no: u8,
        settings: &[u8],
    ) -> tagseal::transport::Result<()> {
        self.settings = Some((file_no, settings.to_vec()));
        Ok(())
    }
}

fn main() {
    // Provisioning -----------------------------------------------------------

    let mut tag = DeskTag::fresh(Uid::new([0x04, 0x8D, 0x58, 0xD2, 0x14, 0x22, 0x90]));
    let tag_key = MasterKey::from_passphrase("orchard-north-fence-7");

    println!("Tag state: {:?}", TagState::Unprovisioned);
    let report = lifecycle::provision(&mut tag, tag_key.clone()).unwrap();
    println!("Ceremony report: {:?}", report);

    // File policy ------------------------------------------------------------

    let mirror_policy = AccessPolicy {
        comm_mode: CommMode::Plain,
        read: AccessCondition::Free,
        write: AccessCondition::Key(0),
        read_write: AccessCondition::Key(0),
        change: AccessCondition::Key(0),
        sdm: Some(SdmPolicy {
            uid_offset: Some(0x20),
            counter_offset: Some(0x43),
            meta_read: AccessCondition::Free,
            file_read: AccessCondition::Key(0),
            counter_retrieval: AccessCondition::Free,
            mac_input_offset: 0x51,
            mac_offset: 0x51,
        }),
    };
    policy::apply(&mut tag, NDEF_FILE_NO, &mirror_policy).unwrap();
    let (file_no, settings) = tag.settings.clone().unwrap();
    println!(
        "File {} settings written: {}",
        file_no,
        hex::encode_upper(settings)
    );

    // Scans ------------------------------------------------------------------

    let mut verifier = SunVerifier::new(tag_key.clone());
    for _ in 0..2 {
        let (message, code) = tag.scan();
        println!(
            "Scan u={} c={} m={} -> {:?}",
            message.uid.to_hex(),
            message.counter.to_hex(),
            code.to_hex(),
            verifier.verify(&message, &code)
        );
    }

    // Presenting the same URL twice has to fail the second time.
    let (message, code) = tag.scan();
    println!(
        "Scan u={} c={} m={} -> {:?}",
        message.uid.to_hex(),
        message.counter.to_hex(),
        code.to_hex(),
        verifier.verify(&message, &code)
    );
    println!(
        "Same URL again -> {:?}",
        verifier.verify(&message, &code)
    );

    // Checksums --------------------------------------------------------------

    let checksum = token::seal("north", "open-weekdays", &tag_key);
    let mut store = MemoryStore::new();
    token::store(&mut store, &checksum);

    let prefix = &checksum[..token::PREFIX_LEN];
    println!("Checksum {} travels as {}", checksum, prefix);

    let full = token::retrieve(&store, prefix).unwrap();
    println!(
        "Prefix {} expands and verifies: {}",
        prefix,
        token::verify(&full, "north", "open-weekdays", &tag_key)
    );
    println!("Opened back up: {}", token::open(&full, &tag_key));
}
