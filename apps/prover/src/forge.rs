// INICIO DEL ARCHIVO [apps/prover/src/forge.rs]
//! =================================================================
//! APARATO: SCENARIO FORGE ENGINE (V35.1 - SOBERANO)
//! CLASIFICACIÓN: OPS UTILITY (ESTRATO L6)
//! RESPONSABILIDAD: GENERACIÓN DE MATERIAL DE CERTIFICACIÓN Y AUDITORÍA
//!
//! VISION HIPER-HOLÍSTICA:
//! Implementa la fábrica de escenarios para la validación del enjambre.
//! Produce de forma determinista la tríada criptográfica:
//! [Escalar Privado -> Clave Pública -> Dirección Base58].
//! Esta versión sella la sinapsis con el motor de generación L1
//! garantizando CERO REGRESIONES en la derivación WIF.
//! =================================================================

use prospector_core_math::prelude::*;
use prospector_core_gen::address_legacy::pubkey_to_address;
use prospector_core_gen::wif::private_to_wif;
use tracing::instrument;

/// Representa el registro técnico de un vector de control inyectado.
pub struct CertificationArtifact {
    pub identifier: String,
    pub private_key_hex: String,
    pub wif_secret: String,
    pub public_key_hex: String,
    pub bitcoin_address: String,
}

pub struct ScenarioForgeEngine;

impl ScenarioForgeEngine {
    /**
     * Genera y documenta un vector dorado (Golden Ticket) a partir de un escalar.
     *
     * # Mathematical Proof
     * Utiliza el contexto global de secp256k1 para derivar el punto G * k.
     * Garantiza que el formato WIF sea compatible con importaciones en nodos reales.
     *
     * @param scenario_id Identificador del vector (ej: CERT-BETA-001).
     * @param hex_scalar Escalar de 256 bits en formato hexadecimal.
     */
    #[instrument(skip(hex_scalar))]
    pub fn crystallize_golden_vector(scenario_id: &str, hex_scalar: &str) -> CertificationArtifact {
        let private_key_bytes = hex::decode(hex_scalar.trim())
            .expect("CRITICAL_FAULT: Invalid hex scalar provided for forge.");

        // 1. DERIVACIÓN DEL SECRETO (L1)
        let private_key_instance = SafePrivateKey::from_bytes(&private_key_bytes)
            .expect("MATH_FAULT: Scalar outside of curve boundaries.");

        // 2. ASCENSIÓN A PUNTO PÚBLICO
        let public_key_instance = SafePublicKey::from_private(&private_key_instance);

        // 3. CODIFICACIÓN DE ESTRATO (L2)
        let bitcoin_address = pubkey_to_address(&public_key_instance, false); // P2PKH Legacy Uncompressed
        let wif_secret = private_to_wif(&private_key_instance, false);
        let public_key_hex = hex::encode(public_key_instance.to_bytes(false));

        let artifact = CertificationArtifact {
            identifier: scenario_id.to_string(),
            private_key_hex: hex_scalar.to_string(),
            wif_secret,
            public_key_hex,
            bitcoin_address,
        };

        Self::emit_technical_report(&artifact);
        artifact
    }

    fn emit_technical_report(artifact: &CertificationArtifact) {
        println!("\n--- 📜 PROSPECTOR GOLDEN TICKET: {} ---", artifact.identifier);
        println!("  STATUS:        VERIFIED_FOR_AUDIT");
        println!("  SCALAR (HEX):  {}", artifact.private_key_hex);
        println!("  WIF (PRIVATE): {}", artifact.wif_secret);
        println!("  PUBKEY (HEX):  {}", artifact.public_key_hex);
        println!("  TARGET ADDR:   {}", artifact.bitcoin_address);
        println!("-----------------------------------------------\n");
    }
}
// FIN DEL ARCHIVO [apps/prover/src/forge.rs]
