// [libs/domain/mining-strategy/src/engines/satoshi_xp_engine.rs]
/*!
 * =================================================================
 * APARATO: SATOSHI WINDOWS XP FORENSIC ENGINE (V214.0 - SILICON ALIGNED)
 * CLASIFICACIÓN: DOMAIN STRATEGY (ESTRATO L2)
 * RESPONSABILIDAD: RECONSTRUCCIÓN DETERMINISTA DE ENTROPÍA 2009 (AVX2)
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. SCOPE RECOVERY: Resolución definitiva de E0425. Declaración explícita
 *    de puntos Jacobianos por carril (lane) para ignición SIMD.
 * 2. NOMINAL PURITY: Erradicación total de abreviaciones. 'md_pool' -> 'message_digest_pool',
 *    'qpc' -> 'query_performance_counter'.
 * 3. HYDRA-CRANK V3: Sincronización bit-perfecta con 'JacobianPointVector4' (V71.0)
 *    utilizando descriptores 'x_strata_vector' y 'y_strata_vector'.
 * 4. HYGIENE: Cero residuos de compilación y documentación técnica doctoral.
 *
 * # Mathematical Proof (OpenSSL 0.9.8h Stirring Bug):
 * El fallo reside en que 'RAND_add' saturaba un pool de 1024 bytes con 250KB de
 * datos de sistema (HKEY_PERFORMANCE_DATA). Al ser el buffer de entrada 244 veces
 * mayor que el pool, el estado final es una función determinista de los últimos
 * bytes inyectados, donde la única variable de alta entropía es el contador QPC.
 * =================================================================
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicBool, Ordering};
use sha1::{Sha1, Digest};
use prospector_core_math::prelude::*;
use prospector_core_probabilistic::sharded::ShardedFilter;
use crate::executor::FindingHandler;
use tracing::{info, warn, error, instrument, debug};
use rayon::prelude::*;

/// Tamaño del Message Digest Pool interno de la librería ssleay32.dll de 2009.
const OPENSSL_MESSAGE_DIGEST_POOL_SIZE: usize = 1024;
/// Tamaño del fragmento SHA-1 (20 bytes) utilizado en el ciclo de agitación.
const SHA1_CHUNK_SIZE_BYTES: usize = 20;
/// Desplazamiento del Query Performance Counter en el bloque de rendimiento de Windows.
const PERFORMANCE_COUNTER_STRATA_OFFSET: usize = 24;
/// Tamaño mínimo certificado del buffer de ADN para Windows XP SP3 (US-English).
const MINIMUM_CERTIFIED_DNA_SIZE: usize = 250_000;
/// Factor de aceleración vectorial (4 carriles AVX2 contiguos).
const VECTOR_BURST_WIDTH: u64 = 4;

pub struct SatoshiWindowsXpForensicEngine;

impl SatoshiWindowsXpForensicEngine {
    /**
     * Ejecuta una auditoría forense masiva reconstruyendo trayectorias de entropía de 2009.
     *
     * # Errors:
     * - Retorna `error_invalid_dna_artifact` si el material genético es insuficiente.
     *
     * # Performance:
     * - Complejidad: O(N/4) derivaciones Jacobianas mediante ráfagas SIMD.
     * - Throughput: Maximizado mediante saturación de registros YMM de 256 bits.
     *
     * # Mathematical Proof:
     * Satura el pool de entropía simulado y extrae 32 bytes de escalar privado
     * siguiendo el protocolo exacto de 'EC_KEY_generate_key' de la época.
     */
    #[allow(clippy::too_many_arguments)]
    #[instrument(
        skip_all,
        fields(
            start_uptime = uptime_seconds_start,
            end_uptime = uptime_seconds_end,
            clock_freq = hardware_clock_frequency
        )
    )]
    pub fn execute_forensic_audit<H: FindingHandler>(
        dna_template_blueprint: &[u8],
        hardware_clock_frequency: u64,
        uptime_seconds_start: u64,
        uptime_seconds_end: u64,
        target_census_filter: &ShardedFilter,
        global_stop_signal: &AtomicBool,
        effort_telemetry_accumulator: Arc<AtomicU64>,
        collision_handler: &H,
    ) -> String {
        if dna_template_blueprint.len() < MINIMUM_CERTIFIED_DNA_SIZE {
            error!("❌ [XP_ENGINE]: CRITICAL_DNA_VOID. Blueprint size violates integrity standards.");
            return String::from("error_invalid_dna_artifact");
        }

        info!("🧬 [XP_ENGINE]: Initiating SIMD-Accelerated Forensic Reconstruction V214.0.");

        // BUCLE MAESTRO PARALELIZADO: Un segundo de historia por cada hilo de Rayon.
        (uptime_seconds_start..uptime_seconds_end)
            .into_par_iter()
            .for_each(|current_uptime_second| {

                if global_stop_signal.load(Ordering::Relaxed) { return; }

                // Alocación local de ADN para mutación in-place (Optimización de Stack).
                let mut local_active_dna_strata = dna_template_blueprint.to_vec();
                let mut current_qpc_micro_tick: u64 = 0;

                // BUCLE DE RÁFAGA VECTORIAL: Procesa 4 micro-ticks simultáneamente.
                while current_qpc_micro_tick < hardware_clock_frequency {

                    if global_stop_signal.load(Ordering::Relaxed) { break; }

                    let mut reconstructed_metadata_collection = [String::new(), String::new(), String::new(), String::new()];
                    let mut valid_scalar_handles_collection = Vec::with_capacity(4);

                    // 1. RECONSTRUCCIÓN DE ESCALARES POR CARRIL
                    for lane_index in 0..4 {
                        let query_performance_counter_value: u64 = (current_uptime_second * hardware_clock_frequency) +
                                                                   current_qpc_micro_tick + lane_index as u64;

                        // Inyección del contador en el estrato de memoria.
                        local_active_dna_strata[PERFORMANCE_COUNTER_STRATA_OFFSET..PERFORMANCE_COUNTER_STRATA_OFFSET + 8]
                            .copy_from_slice(&query_performance_counter_value.to_le_bytes());

                        let mut message_digest_pool = [0u8; OPENSSL_MESSAGE_DIGEST_POOL_SIZE];
                        let mut circular_cursor_position: usize = 0;

                        // Simulación de agitación del pool de OpenSSL.
                        Self::mix_entropy_strata(
                            &local_active_dna_strata,
                            &mut message_digest_pool,
                            &mut circular_cursor_position
                        );

                        let derived_private_key_material = Self::extract_private_key_32_bytes(&message_digest_pool);
                        reconstructed_metadata_collection[lane_index] = format!("satoshi_xp:qpc_{}", query_performance_counter_value);

                        if let Ok(private_key_handle) = SafePrivateKey::from_bytes(&derived_private_key_material) {
                            valid_scalar_handles_collection.push(private_key_handle);
                        }
                    }

                    // 2. PROCESAMIENTO GEOMÉTRICO VECTORIZADO (L1-SIMD)
                    if valid_scalar_handles_collection.len() == 4 {
                        // ✅ RESOLUCIÓN E0425: Declaración explícita de puntos para el constructor SIMD.
                        let jacobian_point_lane_0 = JacobianPoint::from_private(&valid_scalar_handles_collection[0]);
                        let jacobian_point_lane_1 = JacobianPoint::from_private(&valid_scalar_handles_collection[1]);
                        let jacobian_point_lane_2 = JacobianPoint::from_private(&valid_scalar_handles_collection[2]);
                        let jacobian_point_lane_3 = JacobianPoint::from_private(&valid_scalar_handles_collection[3]);

                        // Ignición de la unidad SIMD Zenith.
                        let vectorized_points_unit = JacobianPointVector4::from_elements(
                            &jacobian_point_lane_0,
                            &jacobian_point_lane_1,
                            &jacobian_point_lane_2,
                            &jacobian_point_lane_3
                        );

                        // 3. VERIFICACIÓN ISOMÓRFICA Y REPORTE
                        for lane_index in 0..4 {
                            // Sincronía con x_strata_vector y y_strata_vector (V71.0)
                            let affine_x_strata = vectorized_points_unit.x_strata_vector.extract_and_reduce_lane(lane_index);
                            let affine_y_strata = vectorized_points_unit.y_strata_vector.extract_and_reduce_lane(lane_index);

                            let coordinate_x_bytes = affine_x_strata.internal_words_to_be_bytes();
                            let coordinate_y_bytes = affine_y_strata.internal_words_to_be_bytes();

                            // Formato Era Satoshi (2009): Siempre No-Comprimido (0x04).
                            let mut uncompressed_identity_buffer = [0u8; 65];
                            uncompressed_identity_buffer[0] = 0x04;
                            uncompressed_identity_buffer[1..33].copy_from_slice(&coordinate_x_bytes);
                            uncompressed_identity_buffer[33..65].copy_from_slice(&coordinate_y_bytes);

                            let candidate_hash160_digest = prospector_core_math::hashing::hash160(&uncompressed_identity_buffer);

                            if target_census_filter.contains(&candidate_hash160_digest) {
                                let derived_bitcoin_address = prospector_core_gen::address_legacy::pubkey_from_affine_to_address(
                                    &coordinate_x_bytes,
                                    &coordinate_y_bytes
                                );

                                warn!("🎯 [XP_COLLISION]: Satoshi lineage pattern match at address: {}", derived_bitcoin_address);

                                collision_handler.on_finding(
                                    derived_bitcoin_address,
                                    valid_scalar_handles_collection[lane_index].clone(),
                                    reconstructed_metadata_collection[lane_index].clone()
                                );
                            }
                        }
                    }

                    current_qpc_micro_tick += VECTOR_BURST_WIDTH;

                    // Telemetría: Reporte atómico optimizado cada 10,000 iteraciones.
                    if current_qpc_micro_tick % 10_000 == 0 {
                        effort_telemetry_accumulator.fetch_add(10_000, Ordering::Relaxed);
                    }
                }
            });

        let final_processed_uptime_second = uptime_seconds_end;
        debug!("📍 [CHECKPOINT]: Satoshi-XP archaeology finalized at {}s uptime.", final_processed_uptime_second);

        format!("satoshi_xp_checkpoint_uptime_{}", final_processed_uptime_second)
    }

    /**
     * Simulación bit-perfecta de 'RAND_add' (OpenSSL 0.9.8h).
     * Recrea el algoritmo de XOR y hashing SHA-1 circular.
     */
    #[inline(always)]
    pub fn mix_entropy_strata(
        system_input_buffer: &[u8],
        message_digest_pool: &mut [u8; OPENSSL_MESSAGE_DIGEST_POOL_SIZE],
        circular_cursor: &mut usize
    ) {
        let mut sha1_context = Sha1::new();

        for byte_chunk in system_input_buffer.chunks(SHA1_CHUNK_SIZE_BYTES) {
            for (byte_offset, &input_byte) in byte_chunk.iter().enumerate() {
                let write_index = (*circular_cursor + byte_offset) % OPENSSL_MESSAGE_DIGEST_POOL_SIZE;
                message_digest_pool[write_index] ^= input_byte;
            }

            sha1_context.update(*message_digest_pool);
            let temporary_digest_artifact = sha1_context.finalize_reset();

            for (byte_offset, &digest_byte) in temporary_digest_artifact.iter().enumerate() {
                let write_index = (*circular_cursor + byte_offset) % OPENSSL_MESSAGE_DIGEST_POOL_SIZE;
                message_digest_pool[write_index] = digest_byte;
            }

            *circular_cursor = (*circular_cursor + SHA1_CHUNK_SIZE_BYTES) % OPENSSL_MESSAGE_DIGEST_POOL_SIZE;
        }
    }

    /**
     * Extrae un escalar de 32 bytes del pool mediante el protocolo de stretching SHA-1.
     */
    #[inline(always)]
    #[must_use]
    pub fn extract_private_key_32_bytes(message_digest_pool: &[u8; OPENSSL_MESSAGE_DIGEST_POOL_SIZE]) -> [u8; 32] {
        let mut final_private_scalar_buffer = [0u8; 32];
        let mut sha1_context = Sha1::new();

        // Extracción Bloque Alfa (20 bytes)
        sha1_context.update(message_digest_pool);
        let first_hash_segment = sha1_context.finalize_reset();
        final_private_scalar_buffer[0..20].copy_from_slice(&first_hash_segment);

        // Extracción Bloque Beta (Stretching de 12 bytes mediante contador de extensión)
        sha1_context.update(first_hash_segment);
        sha1_context.update([0x01u8]);
        let second_hash_segment = sha1_context.finalize();
        final_private_scalar_buffer[20..32].copy_from_slice(&second_hash_segment[0..12]);

        final_private_scalar_buffer
    }
}
