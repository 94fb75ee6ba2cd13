use crate::config::GaConfig;
use crate::engine::genome::Chromosome;
use crate::engine::individual::Individual;
use crate::engine::population::Population;
use rand::Rng;

/// Tournament selection: sample `tournament_size` individuals uniformly with
/// replacement and keep the fittest of the sample. Callers must pass a fully
/// evaluated population.
pub fn tournament_selection<'a, R: Rng>(
    population: &'a Population,
    tournament_size: usize,
    rng: &mut R,
) -> &'a Chromosome {
    let individuals = population.individuals();
    let mut best = rng.gen_range(0..individuals.len());

    for _ in 1..tournament_size {
        let idx = rng.gen_range(0..individuals.len());
        if individuals[idx].fitness() > individuals[best].fitness() {
            best = idx;
        }
    }

    individuals[best].chromosome()
}

/// Uniform crossover: each gene comes from the first parent with probability
/// `uniform_rate`, otherwise from the second.
pub fn uniform_crossover<R: Rng>(
    parent1: &Chromosome,
    parent2: &Chromosome,
    uniform_rate: f64,
    rng: &mut R,
) -> Chromosome {
    let genes = parent1
        .genes()
        .iter()
        .zip(parent2.genes())
        .map(|(&a, &b)| if rng.gen::<f64>() <= uniform_rate { a } else { b })
        .collect();
    Chromosome::new(genes, parent1.feature_count())
}

/// Flip each gene independently with probability `mutation_rate`.
pub fn mutate<R: Rng>(genome: &mut Vec<u8>, mutation_rate: f64, rng: &mut R) {
    for gene in genome.iter_mut() {
        if rng.gen::<f64>() < mutation_rate {
            *gene = 1 - *gene;
        }
    }
}

/// Breed the next generation: two independent tournaments per child, uniform
/// crossover, then bitwise mutation. Population size is preserved and every
/// child starts unevaluated. No elitism; the convergence window tolerates the
/// best genome having to win its way back in.
pub fn evolve_population<R: Rng>(
    population: &Population,
    config: &GaConfig,
    rng: &mut R,
) -> Population {
    let mut next = Vec::with_capacity(population.size());

    for _ in 0..population.size() {
        let parent1 = tournament_selection(population, config.tournament_size, rng);
        let parent2 = tournament_selection(population, config.tournament_size, rng);

        let child = uniform_crossover(parent1, parent2, config.uniform_rate, rng);
        let mut genes = child.genes().to_vec();
        mutate(&mut genes, config.mutation_rate, rng);

        next.push(Individual::new(Chromosome::new(
            genes,
            child.feature_count(),
        )));
    }

    Population::from_individuals(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn crossover_extremes_copy_one_parent() {
        let mut rng = StdRng::seed_from_u64(1);
        let p1 = Chromosome::new(vec![1, 1, 1, 1], 4);
        let p2 = Chromosome::new(vec![0, 0, 0, 0], 4);

        assert_eq!(uniform_crossover(&p1, &p2, 1.0, &mut rng), p1);
        assert_eq!(uniform_crossover(&p1, &p2, 0.0, &mut rng), p2);
    }

    #[test]
    fn mutation_rate_one_flips_every_gene() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut genes = vec![1, 0, 1, 0];
        mutate(&mut genes, 1.0, &mut rng);
        assert_eq!(genes, vec![0, 1, 0, 1]);
    }

    #[test]
    fn mutation_rate_zero_is_identity() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut genes = vec![1, 0, 1];
        mutate(&mut genes, 0.0, &mut rng);
        assert_eq!(genes, vec![1, 0, 1]);
    }
}
