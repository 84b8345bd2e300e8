// [libs/domain/mining-strategy/src/engines/dictionary_engine.rs]
/*!
 * =================================================================
 * APARATO: ENTROPY DICTIONARY ENGINE (V31.2 - ZENITH GOLD)
 * CLASIFICACIÓN: DOMAIN STRATEGY (ESTRATO L2)
 * RESPONSABILIDAD: AUDITORÍA PARALELA DE FRASES SEMILLA (BRAINWALLETS)
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. NOMINAL ALIGNMENT: Nivelación total con la API '.contains()' del
 *    ShardedFilter L1, erradicando las advertencias de deprecación.
 * 2. ZERO ABBREVIATIONS: Nomenclatura nominal absoluta aplicada a todas
 *    las estructuras de datos y acumuladores.
 * 3. PARA-HASH EFFICIENCY: Satura los núcleos de CPU mediante el despacho
 *    paralelo de Rayon, procesando ráfagas en O(N/cores).
 * 4. HYGIENE: Erradicación de residuos de logs y placeholders.
 *
 * # Mathematical Proof (Entropy Exhaustion):
 * El motor transforma ráfagas de lenguaje natural en escalares de 256 bits
 * mediante $k = SHA256(UTF8(phrase))$. La probabilidad de colisión se
 * maximiza al auditar simultáneamente los estados comprimido y no-comprimido.
 * =================================================================
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicBool, Ordering};
use prospector_core_math::prelude::*;
use prospector_core_probabilistic::sharded::ShardedFilter;
use crate::executor::FindingHandler;
use tracing::{info, debug, instrument, warn as tracing_warn};
use rayon::prelude::*;

/// Motor de búsqueda de élite basado en diccionarios de alta velocidad.
pub struct EntropyDictionaryEngine;

impl EntropyDictionaryEngine {
    /**
     * Ejecuta una auditoría de fuerza bruta inteligente sobre un lote de frases.
     *
     * # Errors:
     * Implementa una política de 'Fault-Tolerance'. Si la derivación de una clave
     * falla debido a entropía nula, el error se registra pero el enjambre
     * no detiene la misión.
     *
     * # Performance:
     * Satura el ancho de banda del bus de memoria al utilizar paralelismo de
     * Rayon, minimizando el tiempo de inactividad de los núcleos en Colab/GPU.
     *
     * # Mathematical Proof:
     * Utiliza coordenadas Jacobianas para la derivación de la clave pública,
     * aunque en el modo diccionario la operación dominante es el hashing SHA256.
     */
    #[instrument(
        skip_all,
        fields(
            batch_size = dictionary_phrases.len(),
            strata = "L2_DICTIONARY"
        )
    )]
    pub fn execute_dictionary_audit<H: FindingHandler>(
        dictionary_phrases: &[String],
        target_census_filter: &ShardedFilter,
        termination_signal: &AtomicBool,
        effort_telemetry_accumulator: Arc<AtomicU64>,
        collision_handler: &H,
    ) -> String {
        info!(
            "📖 [DICTIONARY]: Initiating parallel audit of {} candidate phrases.",
            dictionary_phrases.len()
        );

        // Registro de progresión para la persistencia del Checkpoint inmutable.
        let last_successfully_audited_index = AtomicU64::new(0);

        // --- ESTRATO DE EJECUCIÓN SOBERANA (PARA-HASH) ---
        dictionary_phrases.par_iter().enumerate().for_each(|(current_iteration_index, target_phrase)| {

            // Verificación reactiva de señal de interrupción del host (Preemption).
            if termination_signal.load(Ordering::Relaxed) {
                return;
            }

            // 1. GENERACIÓN DE ESCALAR SECRETO (BRAINWALLET TRANSFORMATION)
            let private_key_instance = crate::brainwallet::phrase_to_private_key(target_phrase);
            let public_key_instance = SafePublicKey::from_private(&private_key_instance);

            // 2. PROTOCOLO DE DETECCIÓN DUAL (SPECTRUM ANALYSIS)
            // Auditamos ambos formatos de red Bitcoin para cubrir carteras de todas las eras.

            // --- ESCENARIO ALFA: SERIALIZACIÓN COMPRIMIDA (0x02/0x03) ---
            let public_key_compressed_bytes = public_key_instance.to_bytes(true);
            let candidate_hash160_compressed = prospector_core_math::hashing::hash160(&public_key_compressed_bytes);

            // ✅ SINCRO NIVEL DIOS: Uso del método '.contains()' nivelado en L1
            if target_census_filter.contains(&candidate_hash160_compressed) {
                let derived_bitcoin_address = prospector_core_gen::address_legacy::pubkey_to_address(
                    &public_key_instance,
                    true
                );

                tracing_warn!("🎯 [COLLISION]: Compressed Brainwallet located: {}", derived_bitcoin_address);

                collision_handler.on_finding(
                    derived_bitcoin_address,
                    private_key_instance.clone(),
                    format!("dictionary:compressed:{}", target_phrase)
                );
            }

            // --- ESCENARIO BETA: SERIALIZACIÓN NO-COMPRIMIDA (0x04 - SATOSHI ERA) ---
            let public_key_uncompressed_bytes = public_key_instance.to_bytes(false);
            let candidate_hash160_uncompressed = prospector_core_math::hashing::hash160(&public_key_uncompressed_bytes);

            // ✅ SINCRO NIVEL DIOS: Uso del método '.contains()' nivelado en L1
            if target_census_filter.contains(&candidate_hash160_uncompressed) {
                let derived_bitcoin_address = prospector_core_gen::address_legacy::pubkey_to_address(
                    &public_key_instance,
                    false
                );

                tracing_warn!("🎯 [COLLISION]: Uncompressed Brainwallet located: {}", derived_bitcoin_address);

                collision_handler.on_finding(
                    derived_bitcoin_address,
                    private_key_instance,
                    format!("dictionary:uncompressed:{}", target_phrase)
                );
            }

            // 3. ACTUALIZACIÓN DE MÉTRICAS Y RASTRO (HIGH-WATERMARK)
            last_successfully_audited_index.fetch_max(current_iteration_index as u64, Ordering::SeqCst);

            // Incremento atómico del volumen de esfuerzo para telemetría L5.
            effort_telemetry_accumulator.fetch_add(1, Ordering::Relaxed);
        });

        let final_processed_index = last_successfully_audited_index.load(Ordering::SeqCst);
        debug!("📍 [CHECKPOINT]: Dictionary strata audit finalized at index {}.", final_processed_index);

        format!("dictionary_checkpoint_idx_{}", final_processed_index)
    }
}
