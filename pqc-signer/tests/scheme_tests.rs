//! 簽名後端集成測試：篡改敏感性、消息/上下文綁定、長度約束

use pqc_signer::{backend_for, PqcError, Scheme, Signature};
use rand::Rng;

/// Context argument matching the scheme's calling convention
fn context_for(scheme: Scheme) -> Option<&'static [u8]> {
    if scheme.uses_context() {
        Some(b"ZOND")
    } else {
        None
    }
}

/// Positions to flip: the edges plus a handful of random interior bytes
fn sample_positions(len: usize) -> Vec<usize> {
    let mut rng = rand::thread_rng();
    let mut positions = vec![0, len / 2, len - 1];
    positions.extend((0..16).map(|_| rng.gen_range(0..len)));
    positions
}

#[test]
fn test_sign_verify_all_schemes() {
    for scheme in Scheme::ALL {
        let backend = backend_for(scheme);
        let keypair = backend.generate_keypair().unwrap();
        let message = b"Cross-verification round trip";
        let ctx = context_for(scheme);

        let signature = backend.sign(message, ctx, &keypair).unwrap();
        assert!(signature.len() <= scheme.parameters().max_signature_bytes);

        let is_valid = backend
            .verify(&signature, message, ctx, keypair.public_key())
            .unwrap();
        assert!(is_valid, "{} should verify its own signature", scheme);
        println!("✓ {}: sig_len={} bytes", scheme, signature.len());
    }
}

#[test]
fn test_signature_tamper_sensitivity() {
    for scheme in Scheme::ALL {
        let backend = backend_for(scheme);
        let keypair = backend.generate_keypair().unwrap();
        let message = b"Tamper sensitivity";
        let ctx = context_for(scheme);
        let signature = backend.sign(message, ctx, &keypair).unwrap();

        for pos in sample_positions(signature.len()) {
            let mut bytes = signature.as_bytes().to_vec();
            bytes[pos] ^= 0x01;
            let tampered = Signature::new(scheme, bytes).unwrap();

            let is_valid = backend
                .verify(&tampered, message, ctx, keypair.public_key())
                .unwrap();
            assert!(!is_valid, "{}: flipped signature byte {} still verifies", scheme, pos);
        }
    }
}

#[test]
fn test_message_binding() {
    for scheme in Scheme::ALL {
        let backend = backend_for(scheme);
        let keypair = backend.generate_keypair().unwrap();
        let message = b"Message binding check".to_vec();
        let ctx = context_for(scheme);
        let signature = backend.sign(&message, ctx, &keypair).unwrap();

        for pos in [0, message.len() / 2, message.len() - 1] {
            let mut tampered = message.clone();
            tampered[pos] ^= 0x20;
            let is_valid = backend
                .verify(&signature, &tampered, ctx, keypair.public_key())
                .unwrap();
            assert!(!is_valid, "{}: flipped message byte {} still verifies", scheme, pos);
        }
    }
}

#[test]
fn test_context_binding() {
    let backend = backend_for(Scheme::MlDsa87);
    let keypair = backend.generate_keypair().unwrap();
    let message = b"Context binding check";
    let signature = backend.sign(message, Some(b"ZOND"), &keypair).unwrap();

    for pos in 0..4 {
        let mut ctx = b"ZOND".to_vec();
        ctx[pos] ^= 0x01;
        let is_valid = backend
            .verify(&signature, message, Some(ctx.as_slice()), keypair.public_key())
            .unwrap();
        assert!(!is_valid, "flipped context byte {} still verifies", pos);
    }

    let is_valid = backend
        .verify(&signature, message, Some(b""), keypair.public_key())
        .unwrap();
    assert!(!is_valid, "empty context must not match \"ZOND\"");
}

#[test]
fn test_truncated_and_padded_signatures() {
    for scheme in Scheme::ALL {
        let backend = backend_for(scheme);
        let keypair = backend.generate_keypair().unwrap();
        let message = b"Length discipline";
        let ctx = context_for(scheme);
        let signature = backend.sign(message, ctx, &keypair).unwrap();

        let truncated = signature.as_bytes()[..signature.len() - 1].to_vec();
        let truncated = Signature::new(scheme, truncated).unwrap();
        assert!(!backend
            .verify(&truncated, message, ctx, keypair.public_key())
            .unwrap());

        let mut padded = signature.as_bytes().to_vec();
        padded.push(0);
        if padded.len() > scheme.parameters().max_signature_bytes {
            assert!(matches!(
                Signature::new(scheme, padded),
                Err(PqcError::InvalidLength(_))
            ));
        } else {
            let padded = Signature::new(scheme, padded).unwrap();
            assert!(!backend
                .verify(&padded, message, ctx, keypair.public_key())
                .unwrap());
        }
    }
}

#[test]
fn test_cross_key_verification_fails() {
    for scheme in Scheme::ALL {
        let backend = backend_for(scheme);
        let keypair_a = backend.generate_keypair().unwrap();
        let keypair_b = backend.generate_keypair().unwrap();
        let message = b"Signed by A";
        let ctx = context_for(scheme);

        let signature = backend.sign(message, ctx, &keypair_a).unwrap();
        assert!(!backend
            .verify(&signature, message, ctx, keypair_b.public_key())
            .unwrap());
    }
}

#[test]
fn test_multiple_messages() {
    let long_message = "Very long message ".repeat(100);
    let messages = vec![
        b"Message 1".as_slice(),
        b"".as_slice(), // 空消息
        long_message.as_bytes(),
    ];

    for scheme in Scheme::ALL {
        let backend = backend_for(scheme);
        let keypair = backend.generate_keypair().unwrap();
        let ctx = context_for(scheme);

        for (i, message) in messages.iter().enumerate() {
            let signature = backend.sign(message, ctx, &keypair).unwrap();
            let is_valid = backend
                .verify(&signature, message, ctx, keypair.public_key())
                .unwrap();
            assert!(is_valid, "{}: message {} should verify", scheme, i);
        }
    }
}
